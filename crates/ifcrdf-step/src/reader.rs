//! Statement reader: joins physical lines into logical statements.
//!
//! Only lines beginning with `#` start a statement. A statement continues
//! over following lines until a `;` is found outside a quoted string.
//! Continuation lines are trimmed before being appended, except while a
//! quoted string is still open.

use crate::error::StepError;
use std::io::BufRead;
use tracing::debug;

const PROGRESS_INTERVAL: usize = 10_000;

/// One logical statement, possibly assembled from several physical lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Physical line on which the statement started (1-indexed).
    pub line: usize,
    /// Joined statement text, starting with `#`.
    pub text: String,
}

/// Reads logical statements from a buffered source.
pub struct StatementReader<R> {
    reader: R,
    line: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> StatementReader<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: Vec::new(),
        }
    }

    /// Number of physical lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }

    /// Read the next statement, or `None` at end of input.
    pub fn next_statement(&mut self) -> Result<Option<Statement>, StepError> {
        loop {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if !line.starts_with('#') {
                continue;
            }

            let start = self.line;
            let mut text = String::with_capacity(line.len());
            let mut in_quote = false;
            let mut terminated = append_segment(&mut text, &line, &mut in_quote);

            while !terminated {
                let Some(next) = self.read_line()? else {
                    return Err(StepError::UnterminatedStatement { line: start });
                };
                terminated = append_segment(&mut text, &next, &mut in_quote);
            }

            return Ok(Some(Statement { line: start, text }));
        }
    }

    fn read_line(&mut self) -> Result<Option<String>, StepError> {
        self.buf.clear();
        let n = self.reader.read_until(b'\n', &mut self.buf)?;
        if n == 0 {
            return Ok(None);
        }
        self.line += 1;
        if self.line % PROGRESS_INTERVAL == 0 {
            debug!(lines = self.line, "parsed lines");
        }
        // IFC files are nominally ASCII; tolerate stray ISO-8859-1 bytes.
        let text = String::from_utf8_lossy(&self.buf);
        Ok(Some(text.trim_end_matches(['\n', '\r']).to_string()))
    }
}

impl<R: BufRead> Iterator for StatementReader<R> {
    type Item = Result<Statement, StepError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_statement().transpose()
    }
}

/// Append one physical line to a statement and report whether it terminated it.
///
/// Whitespace is trimmed only where it lies outside a quoted string: the
/// start of a line that opens outside quotes, the end of a line that closes
/// outside quotes.
fn append_segment(text: &mut String, line: &str, in_quote: &mut bool) -> bool {
    let segment = if *in_quote { line } else { line.trim_start() };
    let terminated = scan(segment, in_quote);
    let segment = if *in_quote { segment } else { segment.trim_end() };
    text.push_str(segment);
    terminated
}

/// Scan a segment for a terminating `;`, tracking quote state across calls.
fn scan(segment: &str, in_quote: &mut bool) -> bool {
    for ch in segment.chars() {
        match ch {
            '\'' => *in_quote = !*in_quote,
            ';' if !*in_quote => return true,
            _ => {}
        }
    }
    false
}
