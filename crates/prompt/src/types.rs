//! Prompt types for Family Assist.

use family_assist_llm::ChatMessage;
use serde::{Deserialize, Serialize};

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Messages in the order they are sent
    pub messages: Vec<ChatMessage>,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Number of providers rendered into the context
    #[serde(rename = "providerCount")]
    pub provider_count: usize,

    /// Whether any knowledge text was included
    #[serde(rename = "knowledgeIncluded")]
    pub knowledge_included: bool,

    /// Size of the assembled context in bytes
    #[serde(rename = "contextBytes")]
    pub context_bytes: usize,
}
