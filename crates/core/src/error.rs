//! Error types for Family Assist.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, LLM, reference data, prompt and
//! serialization errors.

use thiserror::Error;

/// Unified error type for Family Assist.
///
/// Library functions return `Result<T, AppError>`; the HTTP layer maps any
/// of these to a generic server error.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Completion API errors (transport, status, body)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Provider and knowledge dataset errors
    #[error("Data error: {0}")]
    Data(String),

    /// Prompt assembly errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
