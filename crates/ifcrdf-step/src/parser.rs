//! Statement parser: builds records from logical statements.
//!
//! Each statement is scanned once with a small state machine:
//!
//! 1. `Id`: digits up to `=` give the record id.
//! 2. `Keyword`: characters up to `(` (record has arguments) or `;` (no arguments).
//! 3. `Arguments`: `(` opens a nested list, `)` closes one, `,` separates values.
//! 4. `Quoted`: characters are copied verbatim until the closing `'`.
//!
//! References to records that are already in the table are marked resolved
//! on the spot. Everything else is left for [`crate::resolve_references`].

use crate::error::StepError;
use crate::reader::{Statement, StatementReader};
use crate::record::{ContentKey, Record, RecordTable, Value};
use sha2::{Digest, Sha256};
use std::io::BufRead;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Parser options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Keep a digest of each statement's text for duplicate merging.
    pub retain_content_keys: bool,
}

/// Counters collected while parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Physical lines read.
    pub lines: usize,
    /// Statements turned into records.
    pub records: usize,
    /// References resolved while parsing because the target was already known.
    pub eager_references: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Id,
    Keyword,
    Arguments,
    Quoted,
    Done,
}

/// Parser for the data section of a STEP physical file.
pub struct Parser {
    options: ParseOptions,
    table: RecordTable,
    stats: ParseStats,
}

impl Parser {
    /// Create a parser with an empty record table.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            table: RecordTable::new(),
            stats: ParseStats::default(),
        }
    }

    /// Read every statement from `reader` into the table.
    pub fn read_model<R: BufRead>(&mut self, reader: R) -> Result<ParseStats, StepError> {
        let started = Instant::now();
        let mut statements = StatementReader::new(reader);
        while let Some(statement) = statements.next_statement()? {
            self.parse(&statement)?;
        }
        self.stats.lines = statements.lines_read();
        info!(
            lines = self.stats.lines,
            records = self.stats.records,
            elapsed = ?started.elapsed(),
            "done reading model"
        );
        Ok(self.stats)
    }

    /// Parse one statement and insert the record. Returns the record id.
    pub fn parse_statement(&mut self, text: &str) -> Result<u64, StepError> {
        self.parse(&Statement {
            line: 0,
            text: text.to_string(),
        })
    }

    /// Counters collected so far.
    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    /// The records parsed so far.
    pub fn table(&self) -> &RecordTable {
        &self.table
    }

    /// Consume the parser, returning the record table.
    pub fn into_table(self) -> RecordTable {
        self.table
    }

    fn parse(&mut self, statement: &Statement) -> Result<u64, StepError> {
        let line = statement.line;
        let text = statement.text.as_str();

        let mut state = State::Id;
        let mut id: Option<u64> = None;
        let mut keyword = String::new();
        let mut token = String::new();
        let mut quoted: Option<String> = None;
        let mut current: Vec<Value> = Vec::new();
        let mut stack: Vec<Vec<Value>> = Vec::new();

        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            match state {
                State::Id => {
                    if ch == '=' {
                        let value = token.parse::<u64>().map_err(|_| {
                            StepError::parser(line, None, format!("invalid record id '{token}'"))
                        })?;
                        id = Some(value);
                        token.clear();
                        state = State::Keyword;
                    } else if ch.is_ascii_digit() {
                        token.push(ch);
                    }
                }
                State::Keyword => {
                    if ch == '(' {
                        state = State::Arguments;
                    } else if ch == ';' {
                        state = State::Done;
                    } else if !ch.is_whitespace() {
                        keyword.push(ch);
                    }
                }
                State::Arguments => match ch {
                    '\'' => {
                        quoted.get_or_insert_with(String::new);
                        state = State::Quoted;
                    }
                    '(' => {
                        self.flush(&mut token, &mut quoted, &mut current);
                        stack.push(std::mem::take(&mut current));
                    }
                    ')' => {
                        self.flush(&mut token, &mut quoted, &mut current);
                        match stack.pop() {
                            Some(mut parent) => {
                                parent.push(Value::List(std::mem::take(&mut current)));
                                current = parent;
                            }
                            None => state = State::Done,
                        }
                    }
                    ',' => self.flush(&mut token, &mut quoted, &mut current),
                    _ => token.push(ch),
                },
                State::Quoted => {
                    if ch == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            push_quoted(&mut quoted, '\'');
                        } else {
                            state = State::Arguments;
                        }
                    } else {
                        push_quoted(&mut quoted, ch);
                    }
                }
                State::Done => break,
            }
        }

        let Some(id) = id else {
            return Err(StepError::parser(line, None, "missing '=' after record id"));
        };
        if state != State::Done {
            return Err(StepError::parser(line, Some(id), "unterminated statement"));
        }
        if keyword.is_empty() {
            return Err(StepError::parser(line, Some(id), "missing keyword"));
        }

        let content_key = self
            .options
            .retain_content_keys
            .then(|| content_key(text));
        let record = Record {
            id,
            keyword,
            attributes: current,
            content_key,
        };
        if self.table.insert(record).is_some() {
            warn!(record = id, line, "record id defined twice, keeping the last definition");
        }
        self.stats.records += 1;
        Ok(id)
    }

    /// Turn the pending token into a value of the current list.
    fn flush(&mut self, token: &mut String, quoted: &mut Option<String>, current: &mut Vec<Value>) {
        if let Some(s) = quoted.take() {
            current.push(Value::String(s));
            token.clear();
            return;
        }
        let value = token.trim();
        if value.is_empty() {
            token.clear();
            return;
        }
        let parsed = match value.strip_prefix('#').map(str::parse::<u64>) {
            Some(Ok(target)) if self.table.contains(target) => {
                self.stats.eager_references += 1;
                Value::Resolved(target)
            }
            Some(Ok(target)) => Value::Unresolved(target),
            _ => Value::Literal(value.to_string()),
        };
        current.push(parsed);
        token.clear();
    }
}

fn push_quoted(quoted: &mut Option<String>, ch: char) {
    quoted.get_or_insert_with(String::new).push(ch);
}

/// Digest of the trimmed statement text after the first `=`.
fn content_key(text: &str) -> ContentKey {
    let body = text.split_once('=').map_or(text, |(_, rest)| rest).trim();
    let digest = Sha256::digest(body.as_bytes());
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    key
}

/// Parse a whole model into a record table.
pub fn read_model<R: BufRead>(
    reader: R,
    options: ParseOptions,
) -> Result<(RecordTable, ParseStats), StepError> {
    let mut parser = Parser::new(options);
    let stats = parser.read_model(reader)?;
    debug!(
        eager_references = stats.eager_references,
        "references resolved during parsing"
    );
    Ok((parser.into_table(), stats))
}
