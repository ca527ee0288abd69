#![warn(missing_docs)]

//! Schema collaborators for IFC to RDF conversion.
//!
//! - [`DescriptorTables`]: EXPRESS entities (ordered attributes) and types
//!   (primitive, enumeration, select, aggregate), keyed by keyword
//! - [`OntologySchema`]: class hierarchy, property ranges and enumeration
//!   individuals, with [`Ontology`] as the in-memory implementation
//!
//! Both are built once and shared read-only by all mapping threads.

mod descriptor;
mod error;
mod ontology;

pub use descriptor::{
    Aggregate, AttributeDescriptor, DescriptorMatch, DescriptorTables, EntityDescriptor,
    TypeDescriptor,
};
pub use error::SchemaError;
pub use ontology::{Individual, Ontology, OntologySchema};
