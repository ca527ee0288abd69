//! Physical triple writers.
//!
//! Writers are driven from a single thread. They receive the base and
//! prefix declarations first, then triples in arrival order.

use crate::term::{escape_literal, Iri, Literal, Term, Triple};
use crate::vocab::{rdf, xsd};
use std::io::{self, Write};

/// Single-threaded serializer for triples.
pub trait TripleWriter {
    /// Declare the base IRI.
    fn base(&mut self, iri: &str) -> io::Result<()>;

    /// Declare a namespace prefix.
    fn prefix(&mut self, prefix: &str, namespace: &str) -> io::Result<()>;

    /// Write one triple.
    fn triple(&mut self, triple: &Triple) -> io::Result<()>;

    /// Flush any buffered output.
    fn finish(&mut self) -> io::Result<()>;
}

/// Turtle writer with prefix compaction, one triple per line.
pub struct TurtleWriter<W: Write> {
    out: W,
    prefixes: Vec<(String, String)>,
}

impl<W: Write> TurtleWriter<W> {
    /// Create a writer over `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            prefixes: Vec::new(),
        }
    }

    /// Write a `# ...` comment line.
    pub fn comment(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "# {text}")
    }

    /// Consume the writer, returning the output.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_iri(&mut self, iri: &Iri) -> io::Result<()> {
        match compact(&self.prefixes, iri.as_str()) {
            Some((prefix, local)) => write!(self.out, "{prefix}:{local}"),
            None => write!(self.out, "{iri}"),
        }
    }

    fn write_literal(&mut self, lit: &Literal) -> io::Result<()> {
        write!(self.out, "\"{}\"", escape_literal(lit.lexical()))?;
        if lit.datatype().as_str() != xsd::STRING {
            self.out.write_all(b"^^")?;
            self.write_iri(lit.datatype())?;
        }
        Ok(())
    }
}

impl<W: Write> TripleWriter for TurtleWriter<W> {
    fn base(&mut self, iri: &str) -> io::Result<()> {
        writeln!(self.out, "@base <{iri}> .")
    }

    fn prefix(&mut self, prefix: &str, namespace: &str) -> io::Result<()> {
        self.prefixes.push((prefix.to_string(), namespace.to_string()));
        writeln!(self.out, "@prefix {prefix}: <{namespace}> .")
    }

    fn triple(&mut self, triple: &Triple) -> io::Result<()> {
        self.write_iri(&triple.subject)?;
        if triple.predicate.as_str() == rdf::TYPE {
            self.out.write_all(b" a ")?;
        } else {
            self.out.write_all(b" ")?;
            self.write_iri(&triple.predicate)?;
            self.out.write_all(b" ")?;
        }
        match &triple.object {
            Term::Iri(iri) => self.write_iri(iri)?,
            Term::Literal(lit) => self.write_literal(lit)?,
        }
        self.out.write_all(b" .\n")
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Longest matching prefix whose remainder is a safe local name.
fn compact<'a>(prefixes: &'a [(String, String)], iri: &'a str) -> Option<(&'a str, &'a str)> {
    prefixes
        .iter()
        .filter_map(|(prefix, ns)| {
            let local = iri.strip_prefix(ns.as_str())?;
            is_local_name(local).then_some((prefix.as_str(), ns.len(), local))
        })
        .max_by_key(|(_, len, _)| *len)
        .map(|(prefix, _, local)| (prefix, local))
}

fn is_local_name(local: &str) -> bool {
    let mut chars = local.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => {}
        _ => return false,
    }
    local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// N-Triples writer: full IRIs, no declarations.
pub struct NTriplesWriter<W: Write> {
    out: W,
}

impl<W: Write> NTriplesWriter<W> {
    /// Create a writer over `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the writer, returning the output.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TripleWriter for NTriplesWriter<W> {
    fn base(&mut self, _iri: &str) -> io::Result<()> {
        Ok(())
    }

    fn prefix(&mut self, _prefix: &str, _namespace: &str) -> io::Result<()> {
        Ok(())
    }

    fn triple(&mut self, triple: &Triple) -> io::Result<()> {
        write!(self.out, "{} {} ", triple.subject, triple.predicate)?;
        match &triple.object {
            Term::Iri(iri) => write!(self.out, "{iri}")?,
            Term::Literal(lit) => write!(
                self.out,
                "\"{}\"^^{}",
                escape_literal(lit.lexical()),
                lit.datatype()
            )?,
        }
        self.out.write_all(b" .\n")
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Writer that keeps everything in memory.
#[derive(Debug, Default, Clone)]
pub struct GraphCollector {
    /// Declared base IRI.
    pub base: Option<String>,
    /// Declared prefixes in declaration order.
    pub prefixes: Vec<(String, String)>,
    /// Triples in arrival order.
    pub triples: Vec<Triple>,
}

impl GraphCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TripleWriter for GraphCollector {
    fn base(&mut self, iri: &str) -> io::Result<()> {
        self.base = Some(iri.to_string());
        Ok(())
    }

    fn prefix(&mut self, prefix: &str, namespace: &str) -> io::Result<()> {
        self.prefixes.push((prefix.to_string(), namespace.to_string()));
        Ok(())
    }

    fn triple(&mut self, triple: &Triple) -> io::Result<()> {
        self.triples.push(triple.clone());
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}
