//! LLM client abstraction and request/response types.
//!
//! This module defines the core abstractions for interacting with
//! chat-completion providers.

use family_assist_core::AppResult;
use serde::{Deserialize, Serialize};

/// Answer used when the provider returns no usable completion text.
pub const FALLBACK_ANSWER: &str = "I couldn't generate a response.";

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    Assistant,
    User,
}

/// A single entry of a chat conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }
}

/// LLM chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// Model identifier (e.g., "gpt-4o-mini")
    pub model: String,

    /// Conversation sent to the model, in order
    pub messages: Vec<ChatMessage>,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl LlmRequest {
    /// Create a new request for a model with the given messages.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
        }
    }

    /// Set the temperature for sampling.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// LLM completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated text, or [`FALLBACK_ANSWER`]
    pub content: String,

    /// Model that generated the response
    pub model: String,

    /// Usage statistics
    pub usage: LlmUsage,

    /// Whether `content` is the fallback answer
    #[serde(default)]
    pub fallback: bool,
}

impl LlmResponse {
    /// Build a response from optional completion text.
    ///
    /// Missing or empty text is replaced by [`FALLBACK_ANSWER`].
    pub fn from_completion(content: Option<String>, model: String, usage: LlmUsage) -> Self {
        match content.filter(|c| !c.is_empty()) {
            Some(content) => Self {
                content,
                model,
                usage,
                fallback: false,
            },
            None => {
                tracing::warn!("Completion had no usable content, using fallback answer");
                Self {
                    content: FALLBACK_ANSWER.to_string(),
                    model,
                    usage,
                    fallback: true,
                }
            }
        }
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LlmUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: u32,

    /// Total tokens used
    #[serde(default)]
    pub total_tokens: u32,
}

impl LlmUsage {
    /// Create usage stats from prompt and completion token counts.
    ///
    /// Counts come from upstream bodies, so the total saturates.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// Trait for chat-completion providers.
///
/// This trait abstracts the underlying provider (OpenAI-compatible APIs,
/// Ollama) behind a single non-streaming completion call.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the provider name (e.g., "openai", "ollama").
    fn provider_name(&self) -> &str;

    /// Perform a completion.
    ///
    /// Transport failures, non-success statuses and unparseable bodies are
    /// errors. A well-formed body without completion text is not: it yields
    /// a response carrying [`FALLBACK_ANSWER`].
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse>;
}
