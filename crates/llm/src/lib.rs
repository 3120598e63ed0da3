//! LLM integration crate for Family Assist.
//!
//! This crate provides a provider-agnostic abstraction for chat-completion
//! APIs behind the [`LlmClient`] trait.
//!
//! # Providers
//! - **OpenAI**: any OpenAI-compatible `/chat/completions` endpoint (default)
//! - **Ollama**: local LLM runtime via `/api/chat`
//!
//! # Example
//! ```no_run
//! use family_assist_llm::{ChatMessage, LlmClient, LlmRequest, OpenAiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new("sk-...");
//! let request = LlmRequest::new("gpt-4o-mini", vec![ChatMessage::user("Hello!")]);
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{
    ChatMessage, ChatRole, LlmClient, LlmRequest, LlmResponse, LlmUsage, FALLBACK_ANSWER,
};
pub use factory::{create_client, ClientSettings};
pub use providers::{OllamaClient, OpenAiClient};
pub use types::ProviderType;
