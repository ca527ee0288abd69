#![warn(missing_docs)]

//! Triple model and output plumbing for IFC to RDF conversion.
//!
//! - [`term`]: IRIs, typed literals and triples
//! - [`vocab`]: RDF, XSD, OWL, EXPRESS and list vocabulary constants
//! - [`TripleSink`]: thread-safe consumer used by the mapper
//! - [`QueuedSink`]: bounded queue in front of a single-threaded [`TripleWriter`]
//! - [`TurtleWriter`], [`NTriplesWriter`], [`GraphCollector`]: physical writers
//!
//! # Example
//!
//! ```
//! use ifcrdf_graph::{vocab::rdf, GraphCollector, Iri, QueuedSink, Triple, TripleSink};
//!
//! let sink = QueuedSink::new(GraphCollector::new()).unwrap();
//! sink.triple(Triple::new("http://ex.org/a", rdf::TYPE, Iri::new("http://ex.org/C"))).unwrap();
//! let graph = sink.finish().unwrap();
//! assert_eq!(graph.triples.len(), 1);
//! ```

pub mod term;
pub mod vocab;

mod queue;
mod sink;
mod writer;

pub use queue::{QueuedSink, DEFAULT_QUEUE_CAPACITY};
pub use sink::{CollectingSink, SinkError, TripleSink};
pub use term::{Iri, Literal, Term, Triple};
pub use writer::{GraphCollector, NTriplesWriter, TripleWriter, TurtleWriter};
