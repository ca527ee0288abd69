//! ifcrdf CLI - convert IFC STEP files to RDF
//!
//! Converts a single file, or every `.ifc` file below a directory, to
//! Turtle (or N-Triples when the output ends in `.nt`).

use anyhow::{bail, Context, Result};
use clap::Parser;
use ifcrdf::{ConvertOptions, ConvertReport, Converter, ProgressListener};
use ifcrdf_graph::{NTriplesWriter, QueuedSink, TripleWriter, TurtleWriter};
use ifcrdf_step::detect_schema;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod bundle;

use bundle::{BundleCache, SchemaBundle};

const DEFAULT_FILTER: &str = "ifcrdf=info,ifcrdf_step=info,ifcrdf_cli=info,warn";
const DEFAULT_BASE_PREFIX: &str = "http://linkedbuildingdata.net/ifc/resources";

#[derive(Parser)]
#[command(name = "ifcrdf")]
#[command(about = "Convert IFC STEP files to RDF", long_about = None)]
struct Cli {
    /// Input IFC file
    #[arg(required_unless_present = "dir")]
    input: Option<PathBuf>,

    /// Output file (format determined by extension: .ttl, .nt)
    #[arg(required_unless_present = "dir")]
    output: Option<PathBuf>,

    /// Convert every .ifc file below this directory, writing .ttl files beside them
    #[arg(long, conflicts_with_all = ["input", "output"])]
    dir: Option<PathBuf>,

    /// Directory holding one schema bundle per IFC release
    #[arg(long)]
    schema_dir: PathBuf,

    /// Base URI for instance resources (default: timestamped linkedbuildingdata.net URI)
    #[arg(long)]
    base_uri: Option<String>,

    /// Keep records whose content duplicates an earlier record
    #[arg(long)]
    keep_duplicates: bool,

    /// Share literal holder resources between records with equal values
    #[arg(long)]
    dedup_literals: bool,

    /// TOML file with conversion options; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of mapping threads (default: one per core)
    #[arg(long)]
    threads: Option<usize>,
}

/// Logs progress notifications.
struct LogProgress;

impl ProgressListener for LogProgress {
    fn on_progress(&self, task: &str, message: &str, fraction: f64) {
        info!(task, "{message} ({:.0}%)", fraction * 100.0);
    }

    fn on_finished(&self, task: &str) {
        info!(task, "finished");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    let options = build_options(&cli)?;
    let mut bundles = BundleCache::new(&cli.schema_dir);

    match (&cli.dir, &cli.input, &cli.output) {
        (Some(dir), _, _) => convert_dir(dir, &mut bundles, &options),
        (None, Some(input), Some(output)) => {
            convert_file(input, output, &mut bundles, &options).map(|_| ())
        }
        _ => bail!("Either <INPUT> <OUTPUT> or --dir is required"),
    }
}

/// Options from the config file (if any) with command-line flags applied on top.
fn build_options(cli: &Cli) -> Result<ConvertOptions> {
    let mut options = match &cli.config {
        Some(path) => ConvertOptions::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ConvertOptions::with_base_uri(default_base_uri()),
    };
    if let Some(base) = &cli.base_uri {
        options.base_uri = base.clone();
    }
    if cli.keep_duplicates {
        options.remove_duplicates = false;
    }
    if cli.dedup_literals {
        options.dedup_literal_resources = true;
    }
    if cli.threads.is_some() {
        options.threads = cli.threads;
    }
    options.validate()?;
    Ok(options)
}

fn default_base_uri() -> String {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!("{DEFAULT_BASE_PREFIX}{stamp}/")
}

fn convert_dir(dir: &Path, bundles: &mut BundleCache, options: &ConvertOptions) -> Result<()> {
    let mut inputs = Vec::new();
    collect_ifc_files(dir, &mut inputs)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;
    inputs.sort();
    info!(files = inputs.len(), dir = %dir.display(), "converting directory");

    let mut failed = 0usize;
    for input in &inputs {
        let output = input.with_extension("ttl");
        if let Err(e) = convert_file(input, &output, bundles, options) {
            error!(file = %input.display(), "conversion failed: {e:#}");
            failed += 1;
        }
    }
    if failed > 0 {
        bail!("{failed} of {} files failed to convert", inputs.len());
    }
    Ok(())
}

fn collect_ifc_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_ifc_files(&path, out)?;
        } else if is_ifc(&path) {
            out.push(path);
        }
    }
    Ok(())
}

fn is_ifc(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ifc"))
}

fn convert_file(
    input: &Path,
    output: &Path,
    bundles: &mut BundleCache,
    options: &ConvertOptions,
) -> Result<ConvertReport> {
    let header = File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let version = detect_schema(BufReader::new(header))
        .with_context(|| format!("Failed to read header of {}", input.display()))?
        .with_context(|| format!("Unknown or missing FILE_SCHEMA in {}", input.display()))?;
    let bundle = bundles.get(version)?;
    info!(file = %input.display(), schema = %version, "converting");

    let out = File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    let ntriples = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("nt"));
    let result = write_output(BufWriter::new(out), ntriples, input, &bundle, options);

    match result {
        Ok(report) => {
            info!(
                output = %output.display(),
                triples = report.map.triples,
                errors = report.map.record_errors,
                "wrote {}",
                output.display()
            );
            Ok(report)
        }
        Err(e) => {
            if let Err(remove) = fs::remove_file(output) {
                warn!(output = %output.display(), error = %remove, "could not remove partial output");
            }
            Err(e)
        }
    }
}

/// Everything written after the output file exists goes through here, so any
/// failure reaches the caller's cleanup.
fn write_output<O: Write + Send + 'static>(
    out: O,
    ntriples: bool,
    input: &Path,
    bundle: &SchemaBundle,
    options: &ConvertOptions,
) -> Result<ConvertReport> {
    if ntriples {
        return write_with(NTriplesWriter::new(out), input, bundle, options);
    }
    let mut writer = TurtleWriter::new(out);
    writer
        .comment(&format!("baseURI: {}", options.base_uri))
        .and_then(|()| writer.comment(&format!("imports: {}", bundle.version.ontology_uri())))
        .context("Failed to write output header")?;
    write_with(writer, input, bundle, options)
}

fn write_with<W: TripleWriter + Send + 'static>(
    writer: W,
    input: &Path,
    bundle: &SchemaBundle,
    options: &ConvertOptions,
) -> Result<ConvertReport> {
    let reader = BufReader::new(
        File::open(input).with_context(|| format!("Failed to open {}", input.display()))?,
    );
    let sink = QueuedSink::with_capacity(writer, options.queue_capacity)?;
    let listener = LogProgress;
    let converted = Converter::new(&bundle.tables, &bundle.ontology, options.clone())
        .with_listener(&listener)
        .convert(reader, &sink);
    // Drain the writer thread before reporting either outcome.
    let finished = sink.finish();
    let report = converted.with_context(|| format!("Failed to convert {}", input.display()))?;
    finished.context("Failed to write output")?;
    Ok(report)
}
