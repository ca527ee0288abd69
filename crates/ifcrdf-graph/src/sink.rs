//! Thread-safe triple sinks.
//!
//! Mapping runs on many threads at once, so sinks take `&self` and must
//! deliver each triple atomically. Physical writers are single-threaded
//! ([`crate::TripleWriter`]) and sit behind a [`crate::QueuedSink`].

use crate::term::Triple;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Errors reported by sinks.
#[derive(Error, Debug)]
pub enum SinkError {
    /// I/O error from the physical writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The consumer side stopped accepting triples.
    #[error("triple sink closed")]
    Closed,

    /// The writer thread panicked.
    #[error("triple writer thread panicked")]
    WriterPanicked,
}

/// Consumer of conversion output, shared by all mapping threads.
pub trait TripleSink: Sync {
    /// Declare the base IRI.
    fn base(&self, iri: &str) -> Result<(), SinkError>;

    /// Declare a namespace prefix.
    fn prefix(&self, prefix: &str, namespace: &str) -> Result<(), SinkError>;

    /// Deliver one triple.
    fn triple(&self, triple: Triple) -> Result<(), SinkError>;
}

#[derive(Debug, Default)]
struct Collected {
    base: Option<String>,
    prefixes: Vec<(String, String)>,
    triples: Vec<Triple>,
}

/// In-memory sink that keeps everything it receives.
///
/// Each event takes the lock once, so no lock is held across triples.
#[derive(Debug, Default)]
pub struct CollectingSink {
    inner: Mutex<Collected>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triples received so far.
    pub fn len(&self) -> usize {
        self.lock().triples.len()
    }

    /// True if no triples were received.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the sink, returning the triples in arrival order.
    pub fn into_triples(self) -> Vec<Triple> {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .triples
    }

    /// Declared base IRI.
    pub fn base_iri(&self) -> Option<String> {
        self.lock().base.clone()
    }

    /// Declared prefixes in declaration order.
    pub fn prefixes(&self) -> Vec<(String, String)> {
        self.lock().prefixes.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Collected> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TripleSink for CollectingSink {
    fn base(&self, iri: &str) -> Result<(), SinkError> {
        self.lock().base = Some(iri.to_string());
        Ok(())
    }

    fn prefix(&self, prefix: &str, namespace: &str) -> Result<(), SinkError> {
        self.lock()
            .prefixes
            .push((prefix.to_string(), namespace.to_string()));
        Ok(())
    }

    fn triple(&self, triple: Triple) -> Result<(), SinkError> {
        self.lock().triples.push(triple);
        Ok(())
    }
}
