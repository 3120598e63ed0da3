//! The `/ask` pipeline: match, retrieve, assemble, complete.

use crate::state::AppState;
use family_assist_core::AppResult;
use family_assist_knowledge::{providers_for_county, relevant_knowledge, Provider};
use family_assist_llm::LlmRequest;
use serde::Serialize;
use serde_json::Value;

/// Sampling temperature for every completion.
pub const COMPLETION_TEMPERATURE: f32 = 0.3;

/// Parsed `/ask` body.
///
/// Parsing never fails. Each field has an explicit default:
/// - `question`: absent, null or non-string → `""`
/// - `county`: absent, null, empty or non-string → `None`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AskRequest {
    pub question: String,
    pub county: Option<String>,
}

impl AskRequest {
    /// Parse a raw request body. Anything that is not a JSON object is
    /// treated as an empty one.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => {
                if !value.is_object() {
                    tracing::warn!("Request body is not a JSON object, treating as empty");
                }
                Self::from_value(&value)
            }
            Err(e) => {
                if !body.is_empty() {
                    tracing::warn!("Request body is not valid JSON, treating as empty: {}", e);
                }
                Self::default()
            }
        }
    }

    /// Pull `question` and `county` out of a JSON value.
    pub fn from_value(value: &Value) -> Self {
        let question = value
            .get("question")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let county = value
            .get("county")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Self { question, county }
    }
}

/// Successful `/ask` response.
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub providers: Vec<Provider>,
}

/// Answer a question against the reference data and the completion API.
///
/// Errors only when the completion call itself fails.
pub async fn answer_question(state: &AppState, request: &AskRequest) -> AppResult<AskResponse> {
    let providers = providers_for_county(state.data.providers(), request.county.as_deref());
    let knowledge = relevant_knowledge(state.data.knowledge(), &request.question);

    tracing::info!(
        county = request.county.as_deref().unwrap_or("-"),
        providers = providers.len(),
        knowledge_bytes = knowledge.len(),
        "Answering question"
    );

    let built = state.prompts.build(&providers, &knowledge, &request.question)?;

    tracing::debug!(
        "Prompt built - Providers: {}, Knowledge: {}, Context: {} bytes",
        built.metadata.provider_count,
        built.metadata.knowledge_included,
        built.metadata.context_bytes
    );

    let llm_request =
        LlmRequest::new(&state.model, built.messages).with_temperature(COMPLETION_TEMPERATURE);

    let response = state.llm.complete(&llm_request).await?;

    tracing::debug!(
        "Token usage - Prompt: {}, Completion: {}, Total: {}",
        response.usage.prompt_tokens,
        response.usage.completion_tokens,
        response.usage.total_tokens
    );
    if response.fallback {
        tracing::debug!("Answering with fallback text from {}", response.model);
    }

    Ok(AskResponse {
        answer: response.content,
        providers: providers.into_iter().cloned().collect(),
    })
}
