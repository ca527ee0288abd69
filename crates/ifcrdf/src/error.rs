//! Error types for conversion.

use ifcrdf_graph::SinkError;
use ifcrdf_schema::SchemaError;
use ifcrdf_step::StepError;
use thiserror::Error;

/// Errors that abort the conversion of a file.
///
/// Record-local problems (unknown keywords, enum misses, attribute
/// overflow) are logged and counted in [`crate::MapStats`] instead.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Parsing or reference resolution failed.
    #[error(transparent)]
    Step(#[from] StepError),

    /// Schema collaborators could not be loaded.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The triple sink failed.
    #[error("triple sink failed: {0}")]
    Sink(#[from] SinkError),

    /// A descriptor names a class the ontology does not declare.
    #[error("ontology has no class {class} (needed by record #{record})")]
    MissingClass {
        /// Class IRI that was looked up.
        class: String,
        /// Record being mapped.
        record: u64,
    },

    /// Invalid conversion options.
    #[error("invalid options: {0}")]
    Config(String),

    /// The mapping thread pool could not be built.
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
