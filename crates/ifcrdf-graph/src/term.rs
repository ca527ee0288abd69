//! RDF terms and triples.
//!
//! IRIs are always fully expanded. Literals carry an explicit datatype;
//! there are no language tags and no blank nodes in converted output.

use std::fmt;
use std::sync::Arc;

/// An absolute IRI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(Arc<str>);

impl Iri {
    /// Create an IRI from its full text.
    pub fn new(iri: impl AsRef<str>) -> Self {
        Self(Arc::from(iri.as_ref()))
    }

    /// The full IRI text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part after the last `#` or `/`.
    pub fn local_name(&self) -> &str {
        let s: &str = &self.0;
        s.rfind(['#', '/']).map_or(s, |i| &s[i + 1..])
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Iri {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A typed literal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    lexical: String,
    datatype: Iri,
}

impl Literal {
    /// Create a literal from its lexical form and datatype IRI.
    pub fn new(lexical: impl Into<String>, datatype: impl Into<Iri>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
        }
    }

    /// Lexical form.
    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    /// Datatype IRI.
    pub fn datatype(&self) -> &Iri {
        &self.datatype
    }
}

/// Object position of a triple.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    /// IRI reference
    Iri(Iri),
    /// Typed literal
    Literal(Literal),
}

impl Term {
    /// Try to get as IRI
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal(_) => None,
        }
    }

    /// Try to get as literal
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            Term::Iri(_) => None,
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

/// A single statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Subject
    pub subject: Iri,
    /// Predicate
    pub predicate: Iri,
    /// Object
    pub object: Term,
}

impl Triple {
    /// Create a triple.
    pub fn new(subject: impl Into<Iri>, predicate: impl Into<Iri>, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// Escape special characters for quoted literal output.
///
/// Handles: `\` → `\\`, `"` → `\"`, newline → `\n`, tab → `\t`, carriage return → `\r`.
pub fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}
