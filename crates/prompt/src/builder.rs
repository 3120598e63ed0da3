//! Prompt builder for assembling context and the message sequence.

use crate::templates::{CONTEXT_TEMPLATE, DATA_ONLY_INSTRUCTION, SYSTEM_PROMPT};
use crate::types::{BuiltPrompt, BuiltPromptMetadata};
use family_assist_core::{AppError, AppResult};
use family_assist_knowledge::Provider;
use family_assist_llm::ChatMessage;
use handlebars::Handlebars;

const CONTEXT_TEMPLATE_NAME: &str = "context";

/// Renders context and builds prompts.
///
/// Holds a Handlebars registry with the context template compiled once, so
/// a single builder can be shared by every request.
pub struct PromptBuilder {
    registry: Handlebars<'static>,
}

impl PromptBuilder {
    /// Create a builder with the context template registered.
    pub fn new() -> AppResult<Self> {
        let mut registry = Handlebars::new();

        // Disable HTML escaping for plain text
        registry.register_escape_fn(handlebars::no_escape);

        registry
            .register_template_string(CONTEXT_TEMPLATE_NAME, CONTEXT_TEMPLATE)
            .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

        Ok(Self { registry })
    }

    /// Render the providers section and knowledge text into one block.
    ///
    /// Providers are rendered as a pretty-printed JSON array with every field
    /// preserved; the knowledge text is inserted as is.
    pub fn assemble_context(&self, providers: &[&Provider], knowledge: &str) -> AppResult<String> {
        let providers_json = serde_json::to_string_pretty(providers)?;

        let data = serde_json::json!({
            "providers": providers_json,
            "knowledge": knowledge,
        });

        self.registry
            .render(CONTEXT_TEMPLATE_NAME, &data)
            .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
    }

    /// Build the four-message conversation for a question.
    pub fn build(
        &self,
        providers: &[&Provider],
        knowledge: &str,
        question: &str,
    ) -> AppResult<BuiltPrompt> {
        let context = self.assemble_context(providers, knowledge)?;

        tracing::debug!(
            "Built prompt - providers: {}, knowledge bytes: {}, context bytes: {}",
            providers.len(),
            knowledge.len(),
            context.len()
        );

        let metadata = BuiltPromptMetadata {
            provider_count: providers.len(),
            knowledge_included: !knowledge.is_empty(),
            context_bytes: context.len(),
        };

        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::assistant(DATA_ONLY_INSTRUCTION),
            ChatMessage::assistant(context),
            ChatMessage::user(question),
        ];

        Ok(BuiltPrompt { messages, metadata })
    }
}

/// Render the context block with a one-off builder.
pub fn assemble_context(providers: &[&Provider], knowledge: &str) -> AppResult<String> {
    PromptBuilder::new()?.assemble_context(providers, knowledge)
}

/// Build the message sequence with a one-off builder.
///
/// # Example
/// ```no_run
/// use family_assist_prompt::build_prompt;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let built = build_prompt(&[], "", "Where can I find a food bank?")?;
/// assert_eq!(built.messages.len(), 4);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    providers: &[&Provider],
    knowledge: &str,
    question: &str,
) -> AppResult<BuiltPrompt> {
    PromptBuilder::new()?.build(providers, knowledge, question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use family_assist_llm::ChatRole;
    use serde_json::json;

    fn provider(value: serde_json::Value) -> Provider {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_context_with_no_matches() {
        let context = assemble_context(&[], "").unwrap();
        assert_eq!(context, "\n### PROVIDERS\n[]\n\n### KNOWLEDGE\n\n");
    }

    #[test]
    fn test_context_renders_providers_verbatim() {
        let abq = provider(json!({
            "name": "ABQ Family Center",
            "counties_served": ["Bernalillo"],
            "url": "https://example.org/?a=1&b=<2>"
        }));

        let context = assemble_context(&[&abq], "Food bank info...").unwrap();
        let expected = format!(
            "\n### PROVIDERS\n{}\n\n### KNOWLEDGE\nFood bank info...\n",
            serde_json::to_string_pretty(&[&abq]).unwrap()
        );
        assert_eq!(context, expected);

        // No HTML escaping, field order preserved
        assert!(context.contains("https://example.org/?a=1&b=<2>"));
        let name_at = context.find("\"name\"").unwrap();
        let counties_at = context.find("\"counties_served\"").unwrap();
        assert!(name_at < counties_at);
        assert!(context.contains("\n  {\n    \"name\": \"ABQ Family Center\""));
    }

    #[test]
    fn test_context_is_deterministic() {
        let builder = PromptBuilder::new().unwrap();
        let p = provider(json!({"counties_served": ["Luna"], "name": "Deming Hub"}));
        let first = builder.assemble_context(&[&p], "WIC info...").unwrap();
        let second = builder.assemble_context(&[&p], "WIC info...").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_prompt_message_order() {
        let built = build_prompt(&[], "Food bank info...", "Where can I find a foodbank?").unwrap();

        let roles: Vec<ChatRole> = built.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::System,
                ChatRole::Assistant,
                ChatRole::Assistant,
                ChatRole::User
            ]
        );
        assert_eq!(built.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(built.messages[1].content, "Use only the data provided below.");
        assert!(built.messages[2].content.contains("### KNOWLEDGE\nFood bank info..."));
        assert_eq!(built.messages[3].content, "Where can I find a foodbank?");

        assert_eq!(built.metadata.provider_count, 0);
        assert!(built.metadata.knowledge_included);
        assert_eq!(built.metadata.context_bytes, built.messages[2].content.len());
    }

    #[test]
    fn test_system_prompt_rules() {
        assert!(SYSTEM_PROMPT.contains("trauma-informed"));
        assert!(SYSTEM_PROMPT.contains("Do not give medical advice"));
        assert!(SYSTEM_PROMPT.contains("Do not guess or invent providers"));
        assert!(SYSTEM_PROMPT.contains("tribal"));
        assert!(SYSTEM_PROMPT.contains("If information is missing"));
    }
}
