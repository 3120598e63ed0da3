//! Shared, read-only request state.

use family_assist_core::AppResult;
use family_assist_knowledge::ReferenceData;
use family_assist_llm::LlmClient;
use family_assist_prompt::PromptBuilder;
use std::sync::Arc;

/// Everything a request handler needs.
///
/// Built once at startup. Nothing in here is mutated afterwards, so handlers
/// share it through an `Arc` without locking.
pub struct AppState {
    /// Provider and knowledge datasets
    pub data: ReferenceData,

    /// Completion client
    pub llm: Arc<dyn LlmClient>,

    /// Context template registry
    pub prompts: PromptBuilder,

    /// Model identifier sent with each completion
    pub model: String,
}

impl AppState {
    pub fn new(
        data: ReferenceData,
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            data,
            llm,
            prompts: PromptBuilder::new()?,
            model: model.into(),
        })
    }
}
