#![warn(missing_docs)]

//! STEP physical file reading for IFC models.
//!
//! Parses the data section of an ISO 10303-21 file into a [`RecordTable`],
//! optionally merges records with identical content, and resolves every
//! `#id` reference. A reference to a missing record is fatal for the file.
//!
//! # Example
//!
//! ```no_run
//! use ifcrdf_step::{merge_duplicates, read_model, resolve_references, ParseOptions};
//! use std::io::BufReader;
//!
//! let file = std::fs::File::open("model.ifc").unwrap();
//! let options = ParseOptions { retain_content_keys: true };
//! let (mut table, _) = read_model(BufReader::new(file), options).unwrap();
//! let duplicates = merge_duplicates(&mut table);
//! resolve_references(&mut table, Some(&duplicates)).unwrap();
//! ```

mod error;
mod header;
mod parser;
mod reader;
mod record;
mod resolver;

pub use error::StepError;
pub use header::{detect_schema, SchemaVersion};
pub use parser::{read_model, ParseOptions, ParseStats, Parser};
pub use reader::{Statement, StatementReader};
pub use record::{ContentKey, Record, RecordTable, Value};
pub use resolver::{merge_duplicates, resolve_references, DuplicateIndex, ResolveStats};
