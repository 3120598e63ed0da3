//! Reference data type definitions.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Field every provider record must carry.
pub const COUNTIES_FIELD: &str = "counties_served";

/// A family-support organization and the counties it serves.
///
/// Only `counties_served` is interpreted. The full record, including any
/// descriptive fields (name, contact, services), is kept as loaded and
/// serialized back verbatim in its original key order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Provider {
    /// Lower-cased copy of `counties_served`, used for matching
    counties: Vec<String>,

    /// The record exactly as loaded
    record: Map<String, Value>,
}

impl Provider {
    /// Build a provider from a raw record.
    ///
    /// Fails when `counties_served` is missing or is not an array of strings.
    pub fn from_record(record: Map<String, Value>) -> Result<Self, String> {
        let served = record
            .get(COUNTIES_FIELD)
            .ok_or_else(|| format!("missing `{}`", COUNTIES_FIELD))?;

        let items = served
            .as_array()
            .ok_or_else(|| format!("`{}` must be an array", COUNTIES_FIELD))?;

        let counties = items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_lowercase)
                    .ok_or_else(|| format!("`{}` entries must be strings", COUNTIES_FIELD))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { counties, record })
    }

    /// Whether this provider serves an already lower-cased county.
    ///
    /// Matching is exact against the lower-cased `counties_served` entries.
    pub fn serves(&self, lowered_county: &str) -> bool {
        self.counties.iter().any(|c| c == lowered_county)
    }

    /// The `name` field, when present.
    pub fn name(&self) -> Option<&str> {
        self.record.get("name").and_then(Value::as_str)
    }

    /// Counties as written in the dataset.
    pub fn counties_served(&self) -> Vec<&str> {
        self.record
            .get(COUNTIES_FIELD)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

impl TryFrom<Map<String, Value>> for Provider {
    type Error = String;

    fn try_from(record: Map<String, Value>) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}

impl Serialize for Provider {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

/// A pre-authored snippet retrievable by keyword tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBlock {
    /// Keywords matched as substrings of the question
    pub tags: Vec<String>,

    /// Text handed to the model when any tag matches
    pub content: String,
}

impl KnowledgeBlock {
    /// Create a block from tags and content.
    pub fn new<I, S>(tags: I, content: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            content: content.into(),
        }
    }

    /// Whether any tag occurs in an already lower-cased question.
    pub fn matches(&self, lowered_question: &str) -> bool {
        self.tags
            .iter()
            .any(|tag| lowered_question.contains(tag.to_lowercase().as_str()))
    }
}
