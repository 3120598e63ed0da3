//! LLM provider factory.
//!
//! Builds the completion client from startup configuration. Secrets are
//! handed in explicitly; nothing here reads the environment.

use crate::client::LlmClient;
use crate::providers::{build_http_client, ollama, openai, OllamaClient, OpenAiClient};
use crate::types::ProviderType;
use family_assist_core::{AppConfig, AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Everything needed to construct a client.
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    /// Provider identifier ("openai", "ollama")
    pub provider: String,

    /// Custom base URL; the provider default when absent
    pub endpoint: Option<String>,

    /// API key, required by "openai"
    pub api_key: Option<String>,

    /// Overall outbound request timeout
    pub timeout: Option<Duration>,
}

impl ClientSettings {
    /// Take the client-related fields from the application config.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            provider: config.provider.clone(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Create an LLM client for the configured provider.
///
/// # Errors
/// Returns error if:
/// - Provider is unknown
/// - "openai" is selected without an API key
/// - The HTTP client cannot be built
pub fn create_client(settings: &ClientSettings) -> AppResult<Arc<dyn LlmClient>> {
    let provider = ProviderType::parse(&settings.provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", settings.provider)))?;

    let http = build_http_client(settings.timeout)?;

    match provider {
        ProviderType::OpenAI => {
            let api_key = settings
                .api_key
                .as_deref()
                .ok_or_else(|| AppError::Config("OpenAI provider requires API key".to_string()))?;
            let base_url = settings.endpoint.as_deref().unwrap_or(openai::DEFAULT_BASE_URL);
            tracing::debug!("Creating OpenAI-compatible client for {}", base_url);
            Ok(Arc::new(
                OpenAiClient::with_base_url(base_url, api_key).with_http_client(http),
            ))
        }
        ProviderType::Ollama => {
            let base_url = settings.endpoint.as_deref().unwrap_or(ollama::DEFAULT_BASE_URL);
            tracing::debug!("Creating Ollama client for {}", base_url);
            Ok(Arc::new(
                OllamaClient::with_base_url(base_url).with_http_client(http),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: &str, api_key: Option<&str>) -> ClientSettings {
        ClientSettings {
            provider: provider.to_string(),
            api_key: api_key.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_openai_client() {
        let client = create_client(&settings("openai", Some("sk-test"))).unwrap();
        assert_eq!(client.provider_name(), "openai");
    }

    #[test]
    fn test_openai_requires_api_key() {
        match create_client(&settings("openai", None)) {
            Err(AppError::Config(msg)) => assert!(msg.contains("requires API key")),
            Err(other) => panic!("Unexpected error: {}", other),
            Ok(_) => panic!("Expected error for OpenAI without API key"),
        }
    }

    #[test]
    fn test_create_ollama_with_timeout() {
        let mut s = settings("ollama", None);
        s.endpoint = Some("http://localhost:8080".to_string());
        s.timeout = Some(Duration::from_secs(5));
        let client = create_client(&s).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_unknown_provider() {
        assert!(matches!(
            create_client(&settings("gguf", None)),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = AppConfig::default();
        config.api_key = Some("sk-test".to_string());
        config.timeout_secs = Some(30);

        let s = ClientSettings::from_config(&config);
        assert_eq!(s.provider, "openai");
        assert_eq!(s.api_key.as_deref(), Some("sk-test"));
        assert_eq!(s.timeout, Some(Duration::from_secs(30)));
    }
}
