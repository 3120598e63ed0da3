//! OpenAI-compatible chat completions provider.
//!
//! Works against any server exposing `POST {base}/chat/completions` with
//! bearer-token auth and the `{choices: [{message: {content}}]}` response shape.

use super::error_for_status;
use crate::client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, LlmUsage};
use family_assist_core::{AppError, AppResult};
use serde::Serialize;
use serde_json::Value;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat completions request body.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// OpenAI-compatible LLM client.
pub struct OpenAiClient {
    /// Base URL, without the `/chat/completions` suffix
    base_url: String,

    /// Bearer token
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client for the public OpenAI API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a client for a custom OpenAI-compatible base URL.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Replace the underlying HTTP client (e.g. one built with a timeout).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn to_openai_request<'a>(&self, request: &'a LlmRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
        }
    }

    /// Extract the first choice's text, model and usage from a response body.
    fn convert_response(&self, body: &Value, requested_model: &str) -> LlmResponse {
        let content = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string);

        let model = body
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or(requested_model)
            .to_string();

        let usage = body
            .get("usage")
            .and_then(|u| serde_json::from_value::<LlmUsage>(u.clone()).ok())
            .unwrap_or_default();

        LlmResponse::from_completion(content, model, usage)
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!(
            "Sending chat completion request ({} messages)",
            request.messages.len()
        );
        tracing::debug!("Request: {:?}", request);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&self.to_openai_request(request))
            .send()
            .await
            .map_err(|e| {
                AppError::Llm(format!("Failed to send request to completion API: {}", e))
            })?;

        let response = error_for_status("OpenAI", response).await?;

        let text = response
            .text()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to read completion response: {}", e)))?;

        let body: Value = serde_json::from_str(&text)
            .map_err(|e| AppError::Llm(format!("Failed to parse completion response: {}", e)))?;

        tracing::info!("Received chat completion");
        tracing::debug!("Response: {}", body);

        Ok(self.convert_response(&body, &request.model))
    }
}
