//! The conversion pipeline: parse, merge, resolve, then map in parallel.

use crate::config::ConvertOptions;
use crate::error::Result;
use crate::mapper::{MapStats, Mapper};
use crate::progress::{ProgressListener, ProgressReporter};
use ifcrdf_graph::vocab::{express, list, owl, rdf, xsd};
use ifcrdf_graph::{Iri, Triple, TripleSink};
use ifcrdf_schema::{DescriptorTables, OntologySchema};
use ifcrdf_step::{
    merge_duplicates, read_model, resolve_references, ParseOptions, ParseStats, Record,
    RecordTable, ResolveStats,
};
use rayon::prelude::*;
use std::io::BufRead;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Progress task name of the mapping phase.
pub const GENERATING_TRIPLES: &str = "Generating Triples";

/// Summary of one conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertReport {
    /// Parsing counters.
    pub parse: ParseStats,
    /// Records removed as duplicates.
    pub duplicates: usize,
    /// Resolution counters.
    pub resolve: ResolveStats,
    /// Mapping counters.
    pub map: MapStats,
    /// Wall time of the whole conversion.
    pub elapsed: Duration,
}

/// Declarations and ontology header written before any record triples.
pub fn write_preamble(sink: &dyn TripleSink, base: &str, namespace: &str) -> Result<()> {
    sink.base(base)?;
    let prefixes = [
        ("ifc", namespace),
        ("inst", base),
        ("list", list::NS),
        ("express", express::NS),
        ("rdf", rdf::NS),
        ("xsd", xsd::NS),
        ("owl", owl::NS),
    ];
    for (prefix, ns) in prefixes {
        sink.prefix(prefix, ns)?;
    }
    let ontology = Iri::new(base);
    let imported = namespace.trim_end_matches('#');
    sink.triple(Triple::new(ontology.clone(), rdf::TYPE, Iri::new(owl::ONTOLOGY)))?;
    sink.triple(Triple::new(ontology, owl::IMPORTS, Iri::new(imported)))?;
    Ok(())
}

/// Converts STEP models against one schema.
pub struct Converter<'a> {
    tables: &'a DescriptorTables,
    ontology: &'a dyn OntologySchema,
    options: ConvertOptions,
    listener: Option<&'a dyn ProgressListener>,
}

impl<'a> Converter<'a> {
    /// Create a converter.
    pub fn new(
        tables: &'a DescriptorTables,
        ontology: &'a dyn OntologySchema,
        options: ConvertOptions,
    ) -> Self {
        Self {
            tables,
            ontology,
            options,
            listener: None,
        }
    }

    /// Report mapping progress to `listener`.
    pub fn with_listener(mut self, listener: &'a dyn ProgressListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert one model read from `reader` into `sink`.
    ///
    /// 1. Parses every statement into a record table
    /// 2. Merges duplicate records (if enabled)
    /// 3. Resolves every reference; a dangling one fails the file before
    ///    anything is written
    /// 4. Writes the preamble and maps all records in parallel
    /// 5. Drops the record table
    pub fn convert<R: BufRead>(&self, reader: R, sink: &dyn TripleSink) -> Result<ConvertReport> {
        self.options.validate()?;
        let started = Instant::now();

        let parse_options = ParseOptions {
            retain_content_keys: self.options.remove_duplicates,
        };
        let (mut table, parse) = read_model(reader, parse_options)?;

        let duplicates = self
            .options
            .remove_duplicates
            .then(|| merge_duplicates(&mut table));
        let resolve = resolve_references(&mut table, duplicates.as_ref())?;

        let map = self.map_table(&table, sink)?;
        drop(table);
        debug!("record table released");

        let report = ConvertReport {
            parse,
            duplicates: duplicates.map_or(0, |d| d.len()),
            resolve,
            map,
            elapsed: started.elapsed(),
        };
        info!(
            records = report.map.records_mapped,
            skipped = report.map.records_skipped,
            errors = report.map.record_errors,
            triples = report.map.triples,
            elapsed = ?report.elapsed,
            "conversion finished"
        );
        Ok(report)
    }

    /// Write the preamble and map every record of a resolved table.
    pub fn map_table(&self, table: &RecordTable, sink: &dyn TripleSink) -> Result<MapStats> {
        write_preamble(sink, &self.options.base_uri, self.ontology.namespace())?;

        let mapper = Mapper::new(self.tables, self.ontology, table, sink, &self.options);
        let records: Vec<&Record> = table.iter().collect();
        let progress = ProgressReporter::new(
            self.listener,
            GENERATING_TRIPLES,
            "generated triples for",
            "entities",
            records.len(),
        );
        let started = Instant::now();

        let run = || {
            records.par_iter().try_for_each(|record| -> Result<()> {
                mapper.map_record(record)?;
                progress.advance();
                Ok(())
            })
        };
        match self.options.threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("ifcrdf-map-{i}"))
                .build()?
                .install(run)?,
            None => run()?,
        }
        progress.finish();

        let stats = mapper.stats();
        info!(
            records = records.len(),
            triples = stats.triples,
            elapsed = ?started.elapsed(),
            "generated triples"
        );
        Ok(stats)
    }
}

/// Convert one model with default progress handling.
pub fn convert<R: BufRead>(
    reader: R,
    tables: &DescriptorTables,
    ontology: &dyn OntologySchema,
    options: ConvertOptions,
    sink: &dyn TripleSink,
) -> Result<ConvertReport> {
    Converter::new(tables, ontology, options).convert(reader, sink)
}
