//! Error types for reading and resolving STEP physical files.

use thiserror::Error;

/// Errors that can occur while reading or resolving a STEP file.
#[derive(Error, Debug)]
pub enum StepError {
    /// I/O error reading the input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed statement.
    #[error("Parser error at line {line}{}: {message}", record.map(|id| format!(" (record #{})", id)).unwrap_or_default())]
    Parser {
        /// Physical line on which the statement started (1-indexed, 0 if unknown).
        line: usize,
        /// Record id, if it could be read before the error.
        record: Option<u64>,
        /// Error message.
        message: String,
    },

    /// A statement was still open when the input ended.
    #[error("Unterminated statement starting at line {line}")]
    UnterminatedStatement {
        /// Physical line on which the statement started (1-indexed).
        line: usize,
    },

    /// A reference points at a record that does not exist.
    ///
    /// This is fatal for the whole file.
    #[error("Reference to non-existing record #{target} in #{record}={text}")]
    DanglingReference {
        /// Record holding the reference.
        record: u64,
        /// Referenced id.
        target: u64,
        /// Statement text of the referencing record.
        text: String,
    },
}

impl StepError {
    /// Create a parser error.
    pub fn parser(line: usize, record: Option<u64>, message: impl Into<String>) -> Self {
        Self::Parser {
            line,
            record,
            message: message.into(),
        }
    }

    /// Create a dangling reference error.
    pub fn dangling(record: u64, target: u64, text: impl Into<String>) -> Self {
        Self::DanglingReference {
            record,
            target,
            text: text.into(),
        }
    }
}
