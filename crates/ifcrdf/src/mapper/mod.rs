//! Schema-driven mapping of resolved records to triples.
//!
//! Every record is mapped independently: the descriptor tables, the
//! ontology and the record table are shared read-only, per-record state
//! lives in a [`RecordScope`] owned by the call, and helper resources get
//! content-derived IRIs. That makes [`Mapper::map_record`] safe to call
//! from any number of threads at once.
//!
//! Problems confined to one record (unknown keyword, attribute overflow,
//! enum miss, unsupported nesting) are logged and counted; only a missing
//! ontology class or a failing sink stops the conversion.

mod entity;
mod list;
mod literal;
mod range;
mod type_record;

use crate::config::ConvertOptions;
use crate::error::{ConvertError, Result};
use crate::iri::ResourceMinter;
use dashmap::DashSet;
use ifcrdf_graph::vocab::rdf;
use ifcrdf_graph::{Iri, Term, Triple, TripleSink};
use ifcrdf_schema::{DescriptorMatch, DescriptorTables, OntologySchema, TypeDescriptor};
use ifcrdf_step::{Record, RecordTable};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{trace, warn};

/// Counters collected while mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapStats {
    /// Records whose keyword matched exactly one descriptor.
    pub records_mapped: usize,
    /// Records skipped for property purposes.
    pub records_skipped: usize,
    /// Record-local errors that were logged and skipped.
    pub record_errors: usize,
    /// Triples delivered to the sink.
    pub triples: usize,
}

#[derive(Debug, Default)]
struct Counters {
    mapped: AtomicUsize,
    skipped: AtomicUsize,
    errors: AtomicUsize,
    triples: AtomicUsize,
}

/// Per-record state. Never shared between records.
pub(crate) struct RecordScope<'a> {
    pub(crate) record: &'a Record,
    pub(crate) subject: Iri,
    /// Type named by a bare token, applied to the next sibling value.
    pub(crate) remembrance: Option<&'a TypeDescriptor>,
}

impl<'a> RecordScope<'a> {
    fn new(record: &'a Record, subject: Iri) -> Self {
        Self {
            record,
            subject,
            remembrance: None,
        }
    }
}

/// Maps records of one resolved table onto a [`TripleSink`].
pub struct Mapper<'a> {
    tables: &'a DescriptorTables,
    ontology: &'a dyn OntologySchema,
    records: &'a RecordTable,
    sink: &'a dyn TripleSink,
    minter: ResourceMinter,
    holders: Option<DashSet<Iri>>,
    counters: Counters,
}

impl<'a> Mapper<'a> {
    /// Create a mapper over a resolved record table.
    pub fn new(
        tables: &'a DescriptorTables,
        ontology: &'a dyn OntologySchema,
        records: &'a RecordTable,
        sink: &'a dyn TripleSink,
        options: &ConvertOptions,
    ) -> Self {
        Self {
            tables,
            ontology,
            records,
            sink,
            minter: ResourceMinter::new(options.base_uri.clone()),
            holders: options.dedup_literal_resources.then(DashSet::new),
            counters: Counters::default(),
        }
    }

    /// IRI minter used for all resources.
    pub fn minter(&self) -> &ResourceMinter {
        &self.minter
    }

    /// Counters so far.
    pub fn stats(&self) -> MapStats {
        MapStats {
            records_mapped: self.counters.mapped.load(Ordering::Relaxed),
            records_skipped: self.counters.skipped.load(Ordering::Relaxed),
            record_errors: self.counters.errors.load(Ordering::Relaxed),
            triples: self.counters.triples.load(Ordering::Relaxed),
        }
    }

    /// Map one record.
    pub fn map_record(&self, record: &'a Record) -> Result<()> {
        let tables: &'a DescriptorTables = self.tables;
        match tables.lookup(&record.keyword) {
            DescriptorMatch::Entity(entity) => {
                self.map_entity(record, entity)?;
                self.counters.mapped.fetch_add(1, Ordering::Relaxed);
            }
            DescriptorMatch::Type(ty) => {
                self.map_type_record(record, ty)?;
                self.counters.mapped.fetch_add(1, Ordering::Relaxed);
            }
            DescriptorMatch::Both(entity, _) => {
                warn!(
                    record = record.id,
                    keyword = %record.keyword,
                    "keyword names both an entity and a type, properties skipped"
                );
                let subject = self.minter.entity(&entity.name, record.id);
                self.type_as(&subject, &self.schema_iri(&entity.name), record.id)?;
                self.skip_record();
            }
            DescriptorMatch::None => {
                warn!(
                    record = record.id,
                    keyword = %record.keyword,
                    text = %record,
                    "keyword matches no entity or type"
                );
                let class = self.schema_iri(&record.keyword);
                if self.ontology.contains_class(&class) {
                    let subject = self.minter.entity(&record.keyword, record.id);
                    self.emit(&subject, rdf::TYPE, Iri::new(class))?;
                }
                self.skip_record();
            }
        }
        Ok(())
    }

    fn skip_record(&self) {
        self.counters.skipped.fetch_add(1, Ordering::Relaxed);
        self.record_error();
    }

    fn record_error(&self) {
        self.counters.errors.fetch_add(1, Ordering::Relaxed);
    }

    fn schema_iri(&self, local: &str) -> String {
        self.ontology.schema_iri(local)
    }

    /// Name used in a record's IRI: the descriptor's spelling, else the keyword.
    fn resource_name(&self, keyword: &'a str) -> &'a str {
        let tables: &'a DescriptorTables = self.tables;
        match tables.lookup(keyword) {
            DescriptorMatch::Entity(e) | DescriptorMatch::Both(e, _) => e.name.as_str(),
            DescriptorMatch::Type(t) => t.name.as_str(),
            DescriptorMatch::None => keyword,
        }
    }

    /// IRI of the resource a reference points at. Only the target's
    /// keyword and id are needed, never its mapped state.
    fn referent(&self, scope: &RecordScope<'a>, id: u64) -> Option<Iri> {
        let records: &'a RecordTable = self.records;
        match records.get(id) {
            Some(target) => Some(self.minter.entity(self.resource_name(&target.keyword), id)),
            None => {
                warn!(
                    record = scope.record.id,
                    target = id,
                    "reference to a record that is not in the table"
                );
                self.record_error();
                None
            }
        }
    }

    /// `rdf:type` for a record's own resource; the class must exist.
    fn type_as(&self, subject: &Iri, class: &str, record: u64) -> Result<()> {
        if !self.ontology.contains_class(class) {
            return Err(ConvertError::MissingClass {
                class: class.to_string(),
                record,
            });
        }
        self.emit(subject, rdf::TYPE, Iri::new(class))
    }

    fn emit(&self, subject: &Iri, predicate: impl Into<Iri>, object: impl Into<Term>) -> Result<()> {
        let triple = Triple::new(subject.clone(), predicate, object);
        trace!(subject = %triple.subject, predicate = %triple.predicate, "triple");
        self.sink.triple(triple)?;
        self.counters.triples.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
