#![warn(missing_docs)]

//! IFC STEP to RDF conversion.
//!
//! Reads a STEP physical file with [`ifcrdf_step`], resolves its references,
//! and maps every record onto triples as described by EXPRESS descriptor
//! tables and an ontology ([`ifcrdf_schema`]). Triples go to any
//! [`ifcrdf_graph::TripleSink`], typically a bounded [`ifcrdf_graph::QueuedSink`]
//! in front of a Turtle writer.
//!
//! # Example
//!
//! ```no_run
//! use ifcrdf::{convert, ConvertOptions};
//! use ifcrdf_graph::{QueuedSink, TurtleWriter};
//! use ifcrdf_schema::{DescriptorTables, Ontology};
//! use std::fs::File;
//! use std::io::{BufReader, BufWriter};
//!
//! let tables = DescriptorTables::load("IFC4_ADD1/descriptors.json").unwrap();
//! let ontology = Ontology::load("IFC4_ADD1/ontology.json").unwrap();
//! let options = ConvertOptions::with_base_uri("http://example.org/model/");
//!
//! let out = BufWriter::new(File::create("model.ttl").unwrap());
//! let sink = QueuedSink::with_capacity(TurtleWriter::new(out), options.queue_capacity).unwrap();
//! let input = BufReader::new(File::open("model.ifc").unwrap());
//! let report = convert(input, &tables, &ontology, options, &sink).unwrap();
//! sink.finish().unwrap();
//! println!("{} triples", report.map.triples);
//! ```

pub mod config;
pub mod error;
pub mod iri;
pub mod progress;

mod convert;
mod mapper;

pub use config::ConvertOptions;
pub use convert::{convert, write_preamble, ConvertReport, Converter, GENERATING_TRIPLES};
pub use error::{ConvertError, Result};
pub use iri::{HelperKey, ResourceMinter};
pub use mapper::{MapStats, Mapper};
pub use progress::{ProgressListener, ProgressReporter, StatefulProgressListener, TaskProgress};
