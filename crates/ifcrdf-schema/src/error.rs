//! Error types for loading schema collaborators.

use thiserror::Error;

/// Errors that can occur while loading descriptor tables or an ontology.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// I/O error reading a schema file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document parsed but is inconsistent.
    #[error("Invalid schema: {0}")]
    Invalid(String),
}

impl SchemaError {
    /// Create an invalid-schema error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
