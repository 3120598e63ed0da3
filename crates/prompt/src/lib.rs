//! Prompt system for Family Assist.
//!
//! This crate turns matched providers, retrieved knowledge and the user's
//! question into the fixed four-message conversation sent to the model:
//! 1. system rules
//! 2. assistant instruction to use only the supplied data
//! 3. assistant context (providers + knowledge)
//! 4. the user's question

pub mod builder;
pub mod templates;
pub mod types;

// Re-export main types
pub use builder::{assemble_context, build_prompt, PromptBuilder};
pub use templates::{DATA_ONLY_INSTRUCTION, SYSTEM_PROMPT};
pub use types::{BuiltPrompt, BuiltPromptMetadata};
