//! Configuration management for Family Assist.
//!
//! This module handles loading and merging configuration from multiple sources,
//! lowest precedence first:
//! - Built-in defaults
//! - Config file (`family-assist.yaml` or `--config`)
//! - Environment variables
//! - Command-line flags
//!
//! The resulting `AppConfig` is built once at startup and passed by reference
//! to whatever needs it. Nothing downstream reads the environment directly.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "family-assist.yaml";

/// Environment variable holding the completion API key unless the config
/// file names another one.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Providers the client factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 2] = ["openai", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config file that was merged, if any
    pub config_file: Option<PathBuf>,

    /// Interface to bind the HTTP server to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Provider dataset (JSON or YAML)
    pub providers_path: PathBuf,

    /// Knowledge block dataset (JSON or YAML)
    pub knowledge_path: PathBuf,

    /// Completion provider ("openai" or "ollama")
    pub provider: String,

    /// Model identifier sent with every completion request
    pub model: String,

    /// Custom completion endpoint base URL
    pub endpoint: Option<String>,

    /// Name of the environment variable the API key was read from
    pub api_key_env: String,

    /// API key for the completion provider
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Outbound request timeout; none by default
    pub timeout_secs: Option<u64>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Command-line values that take precedence over everything else.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub providers_path: Option<PathBuf>,
    pub knowledge_path: Option<PathBuf>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    server: Option<ServerSection>,
    data: Option<DataSection>,
    llm: Option<LlmSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DataSection {
    providers: Option<PathBuf>,
    knowledge: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
    #[serde(rename = "timeoutSecs")]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            host: "0.0.0.0".to_string(),
            port: 3000,
            providers_path: PathBuf::from("data/providers.json"),
            knowledge_path: PathBuf::from("data/knowledgeBlocks.json"),
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            endpoint: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_key: None,
            timeout_secs: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and process environment.
    ///
    /// Environment variables:
    /// - `FAMILY_ASSIST_CONFIG`: Path to config file
    /// - `FAMILY_ASSIST_HOST`, `PORT`: Listening address
    /// - `FAMILY_ASSIST_PROVIDERS`, `FAMILY_ASSIST_KNOWLEDGE`: Dataset paths
    /// - `FAMILY_ASSIST_PROVIDER`, `FAMILY_ASSIST_MODEL`, `FAMILY_ASSIST_ENDPOINT`
    /// - `FAMILY_ASSIST_TIMEOUT_SECS`: Outbound timeout
    /// - `OPENAI_API_KEY` (or the variable named by `llm.apiKeyEnv`)
    /// - `RUST_LOG`, `NO_COLOR`
    ///
    /// # Example
    /// ```no_run
    /// use family_assist_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None).expect("Failed to load config");
    /// println!("Listening on {}", config.bind_address());
    /// ```
    pub fn load(config_file: Option<PathBuf>) -> AppResult<Self> {
        Self::load_with(config_file, |key| std::env::var(key).ok())
    }

    /// Load configuration with an injectable environment lookup.
    pub fn load_with<F>(config_file: Option<PathBuf>, env: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let explicit = config_file.or_else(|| env("FAMILY_ASSIST_CONFIG").map(PathBuf::from));
        let config_path = match explicit {
            Some(path) if !path.exists() => {
                return Err(AppError::Config(format!(
                    "Config file does not exist: {:?}",
                    path
                )));
            }
            Some(path) => Some(path),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                fallback.exists().then_some(fallback)
            }
        };

        if let Some(path) = config_path {
            config.merge_yaml(&path)?;
            config.config_file = Some(path);
        }

        // Environment variables override YAML config
        if let Some(host) = env("FAMILY_ASSIST_HOST") {
            config.host = host;
        }

        if let Some(port) = env("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid PORT {:?}: {}", port, e)))?;
        }

        if let Some(path) = env("FAMILY_ASSIST_PROVIDERS") {
            config.providers_path = PathBuf::from(path);
        }

        if let Some(path) = env("FAMILY_ASSIST_KNOWLEDGE") {
            config.knowledge_path = PathBuf::from(path);
        }

        if let Some(provider) = env("FAMILY_ASSIST_PROVIDER") {
            config.provider = provider;
        }

        if let Some(model) = env("FAMILY_ASSIST_MODEL") {
            config.model = model;
        }

        if let Some(endpoint) = env("FAMILY_ASSIST_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        if let Some(timeout) = env("FAMILY_ASSIST_TIMEOUT_SECS") {
            let secs = timeout.trim().parse().map_err(|e| {
                AppError::Config(format!(
                    "Invalid FAMILY_ASSIST_TIMEOUT_SECS {:?}: {}",
                    timeout, e
                ))
            })?;
            config.timeout_secs = Some(secs);
        }

        config.api_key = env(&config.api_key_env).filter(|key| !key.is_empty());

        if let Some(level) = env("RUST_LOG") {
            config.log_level = Some(level);
        }

        if env("NO_COLOR").is_some() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &Path) -> AppResult<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        if let Some(server) = file.server {
            if let Some(host) = server.host {
                self.host = host;
            }
            if let Some(port) = server.port {
                self.port = port;
            }
        }

        if let Some(data) = file.data {
            if let Some(providers) = data.providers {
                self.providers_path = providers;
            }
            if let Some(knowledge) = data.knowledge {
                self.knowledge_path = knowledge;
            }
        }

        if let Some(llm) = file.llm {
            if let Some(provider) = llm.provider {
                self.provider = provider;
            }
            if let Some(model) = llm.model {
                self.model = model;
            }
            if llm.endpoint.is_some() {
                self.endpoint = llm.endpoint;
            }
            if let Some(api_key_env) = llm.api_key_env {
                self.api_key_env = api_key_env;
            }
            if llm.timeout_secs.is_some() {
                self.timeout_secs = llm.timeout_secs;
            }
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
        }

        Ok(())
    }

    /// Apply CLI overrides to the configuration.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(host) = overrides.host {
            self.host = host;
        }

        if let Some(port) = overrides.port {
            self.port = port;
        }

        if let Some(path) = overrides.providers_path {
            self.providers_path = path;
        }

        if let Some(path) = overrides.knowledge_path {
            self.knowledge_path = path;
        }

        if let Some(provider) = overrides.provider {
            self.provider = provider;
        }

        if let Some(model) = overrides.model {
            self.model = model;
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = Some(log_level);
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        self
    }

    /// Address string for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate configuration before startup.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider == "openai" && self.api_key.is_none() {
            return Err(AppError::Config(format!(
                "API key not found in environment variable: {}",
                self.api_key_env
            )));
        }

        if self.port == 0 {
            return Err(AppError::Config("Port must be non-zero".to_string()));
        }

        for path in [&self.providers_path, &self.knowledge_path] {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Dataset file not found: {:?}",
                    path
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn yaml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.provider, "openai");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.api_key_env, "OPENAI_API_KEY");
        assert!(config.timeout_secs.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_load_from_env() {
        let env = env_from(&[
            ("PORT", "8080"),
            ("OPENAI_API_KEY", "sk-test"),
            ("FAMILY_ASSIST_MODEL", "gpt-4o"),
            ("FAMILY_ASSIST_TIMEOUT_SECS", "20"),
            ("NO_COLOR", "1"),
        ]);

        let config = AppConfig::load_with(None, env).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout_secs, Some(20));
        assert!(config.no_color);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = AppConfig::load_with(None, env_from(&[("PORT", "not-a-port")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_empty_api_key_ignored() {
        let config = AppConfig::load_with(None, env_from(&[("OPENAI_API_KEY", "")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let result = AppConfig::load_with(
            Some(PathBuf::from("/definitely/not/here.yaml")),
            env_from(&[]),
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_yaml_merge_and_env_precedence() {
        let file = yaml_file(
            r#"
server:
  port: 4000
data:
  providers: /srv/providers.yaml
llm:
  model: gpt-4.1-mini
  apiKeyEnv: FAMILY_KEY
  timeoutSecs: 15
logging:
  level: warn
  color: false
"#,
        );

        let env = env_from(&[("FAMILY_KEY", "secret"), ("FAMILY_ASSIST_MODEL", "override")]);
        let config = AppConfig::load_with(Some(file.path().to_path_buf()), env).unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.providers_path, PathBuf::from("/srv/providers.yaml"));
        assert_eq!(config.knowledge_path, PathBuf::from("data/knowledgeBlocks.json"));
        assert_eq!(config.api_key_env, "FAMILY_KEY");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.model, "override");
        assert_eq!(config.timeout_secs, Some(15));
        assert_eq!(config.log_level.as_deref(), Some("warn"));
        assert!(config.no_color);
        assert_eq!(config.config_file.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let file = yaml_file("server: [unclosed");
        let result = AppConfig::load_with(Some(file.path().to_path_buf()), env_from(&[]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(ConfigOverrides {
            port: Some(9000),
            provider: Some("ollama".to_string()),
            model: Some("llama3.2".to_string()),
            verbose: true,
            ..Default::default()
        });

        assert_eq!(config.port, 9000);
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "llama3.2");
        assert!(config.verbose);
        assert_eq!(config.log_level, Some("debug".to_string()));
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_openai_requires_key() {
        let config = AppConfig::default();
        match config.validate() {
            Err(AppError::Config(msg)) => assert!(msg.contains("OPENAI_API_KEY")),
            other => panic!("Expected missing key error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_missing_dataset() {
        let mut config = AppConfig::default();
        config.api_key = Some("sk-test".to_string());
        config.providers_path = PathBuf::from("/nope/providers.json");
        match config.validate() {
            Err(AppError::Config(msg)) => assert!(msg.contains("Dataset file not found")),
            other => panic!("Expected dataset error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_ok() {
        let providers = tempfile::NamedTempFile::new().unwrap();
        let knowledge = tempfile::NamedTempFile::new().unwrap();

        let mut config = AppConfig::default();
        config.provider = "ollama".to_string();
        config.providers_path = providers.path().to_path_buf();
        config.knowledge_path = knowledge.path().to_path_buf();
        assert!(config.validate().is_ok());
    }
}
