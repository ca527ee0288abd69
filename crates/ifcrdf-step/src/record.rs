//! Record model: the raw graph of statements built by the parser.
//!
//! A record has an id, a keyword and a flat list of attribute values.
//! Values can be nested (lists within lists). References start out as
//! [`Value::Unresolved`] and are turned into [`Value::Resolved`] once the
//! target is known to exist in the [`RecordTable`].

use std::collections::BTreeMap;
use std::fmt;

/// A single attribute value in a STEP record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Bare token: `$`, `*`, `.T.`, numbers, type names such as `IFCLABEL`.
    Literal(String),
    /// Quoted string contents, without the surrounding quotes.
    String(String),
    /// Reference to a record that has not been checked yet (`#123`).
    Unresolved(u64),
    /// Reference to a record known to be present in the table.
    Resolved(u64),
    /// Parenthesized list of values.
    List(Vec<Value>),
}

impl Value {
    /// Try to get as a bare or quoted literal.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Value::Literal(s) | Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the referenced id (resolved or not).
    pub fn as_reference(&self) -> Option<u64> {
        match self {
            Value::Unresolved(id) | Value::Resolved(id) => Some(*id),
            _ => None,
        }
    }

    /// Try to get as a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    /// Check if this is the null marker `$`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Literal(s) if s == "$")
    }

    /// Check if this is the derived marker `*`.
    pub fn is_derived(&self) -> bool {
        matches!(self, Value::Literal(s) if s == "*")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(s) => f.write_str(s),
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Unresolved(id) | Value::Resolved(id) => write!(f, "#{id}"),
            Value::List(items) => {
                f.write_str("(")?;
                write_values(f, items)?;
                f.write_str(")")
            }
        }
    }
}

fn write_values(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

/// SHA-256 digest of a statement's text after the `=`.
pub type ContentKey = [u8; 32];

/// A parsed STEP statement (`#id=KEYWORD(args);`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Record id (from `#123`).
    pub id: u64,
    /// Keyword as written in the file (e.g. `IFCWALL`).
    pub keyword: String,
    /// Attribute values in source order.
    pub attributes: Vec<Value>,
    /// Digest of the post-`=` text, only kept when duplicate merging is requested.
    pub content_key: Option<ContentKey>,
}

impl Record {
    /// Create a record without a content key.
    pub fn new(id: u64, keyword: impl Into<String>, attributes: Vec<Value>) -> Self {
        Self {
            id,
            keyword: keyword.into(),
            attributes,
            content_key: None,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}={}(", self.id, self.keyword)?;
        write_values(f, &self.attributes)?;
        f.write_str(");")
    }
}

/// All records of a file, ordered by id.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    records: BTreeMap<u64, Record>,
}

impl RecordTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the record previously stored under the same id.
    pub fn insert(&mut self, record: Record) -> Option<Record> {
        self.records.insert(record.id, record)
    }

    /// Get a record by id.
    pub fn get(&self, id: u64) -> Option<&Record> {
        self.records.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: u64) -> Option<&mut Record> {
        self.records.get_mut(&id)
    }

    /// Check whether a record with this id exists.
    pub fn contains(&self, id: u64) -> bool {
        self.records.contains_key(&id)
    }

    /// Remove a record.
    pub fn remove(&mut self, id: u64) -> Option<Record> {
        self.records.remove(&id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record ids in ascending order.
    pub fn ids(&self) -> Vec<u64> {
        self.records.keys().copied().collect()
    }

    /// Iterate over records in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }
}
