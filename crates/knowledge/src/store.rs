//! Static reference data loaded once at startup.

use crate::types::{KnowledgeBlock, Provider};
use family_assist_core::{AppError, AppResult};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Dataset file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    Yaml,
}

impl DatasetFormat {
    /// Detect the format from a file extension. Anything not YAML is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Immutable provider and knowledge datasets.
///
/// Built once during initialization and shared read-only across requests.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    providers: Vec<Provider>,
    knowledge: Vec<KnowledgeBlock>,
}

impl ReferenceData {
    /// Wrap already-parsed datasets.
    pub fn new(providers: Vec<Provider>, knowledge: Vec<KnowledgeBlock>) -> Self {
        Self {
            providers,
            knowledge,
        }
    }

    /// Load both datasets from disk.
    pub fn load(providers_path: &Path, knowledge_path: &Path) -> AppResult<Self> {
        let providers: Vec<Provider> = load_records(providers_path, "provider")?;
        let knowledge: Vec<KnowledgeBlock> = load_records(knowledge_path, "knowledge block")?;

        tracing::info!(
            "Loaded {} providers from {:?} and {} knowledge blocks from {:?}",
            providers.len(),
            providers_path,
            knowledge.len(),
            knowledge_path
        );

        Ok(Self::new(providers, knowledge))
    }

    /// All providers in load order.
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// All knowledge blocks in load order.
    pub fn knowledge(&self) -> &[KnowledgeBlock] {
        &self.knowledge
    }
}

/// Read a file holding an array of records.
///
/// Records are parsed one at a time so an error can name the offending index.
fn load_records<T: DeserializeOwned>(path: &Path, kind: &str) -> AppResult<Vec<T>> {
    let format = DatasetFormat::from_path(path);
    tracing::debug!("Loading {} records from {:?} as {}", kind, path, format.as_str());

    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Data(format!("Failed to read {:?}: {}", path, e)))?;

    let items: Vec<serde_json::Value> = match format {
        DatasetFormat::Json => serde_json::from_str(&raw).map_err(|e| e.to_string()),
        DatasetFormat::Yaml => serde_yaml::from_str(&raw).map_err(|e| e.to_string()),
    }
    .map_err(|e| AppError::Data(format!("{:?} is not an array of records: {}", path, e)))?;

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| {
                AppError::Data(format!("Invalid {} #{} in {:?}: {}", kind, index, path, e))
            })
        })
        .collect()
}
