//! Reference data for Family Assist.
//!
//! Holds the provider and knowledge-block datasets and the two filters the
//! `/ask` endpoint runs over them:
//! - county → providers serving that county
//! - question → knowledge blocks whose tags appear in it

pub mod matching;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use matching::{matching_blocks, providers_for_county, relevant_knowledge};
pub use store::{DatasetFormat, ReferenceData};
pub use types::{KnowledgeBlock, Provider};
