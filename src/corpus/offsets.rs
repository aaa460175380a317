//! Offset table
//!
//! Start positions of the concatenated documents, one per document, strictly
//! increasing, first entry `0`. Stored as text: one decimal number per line.

use super::error::{CorpusError, CorpusResult};
use super::types::{Rank, TextPosition};
use std::fmt::Write as _;
use std::fs;
use std::ops::Range;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetTable {
    starts: Vec<TextPosition>,
}

impl OffsetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of the next document
    pub(crate) fn push(&mut self, start: TextPosition) {
        debug_assert!(
            self.starts.last().map_or(start == 0, |&last| start > last),
            "offsets must start at 0 and strictly increase"
        );
        self.starts.push(start);
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn as_slice(&self) -> &[TextPosition] {
        &self.starts
    }

    pub fn iter(&self) -> impl Iterator<Item = TextPosition> + '_ {
        self.starts.iter().copied()
    }

    /// Index of the document owning `position` (greatest start <= position)
    ///
    /// A delimiter byte belongs to the document before it. Positions at or
    /// past `corpus_len` have no owner.
    pub fn document_at(&self, position: TextPosition, corpus_len: TextPosition) -> Option<usize> {
        if position >= corpus_len {
            return None;
        }
        // upper_bound - 1
        self.starts
            .partition_point(|&start| start <= position)
            .checked_sub(1)
    }

    /// Byte range of document `index`, excluding the delimiter after it
    pub fn document_span(&self, index: usize, corpus_len: TextPosition) -> Option<Range<TextPosition>> {
        let start = *self.starts.get(index)?;
        let end = match self.starts.get(index + 1) {
            Some(&next) => next - 1,
            None => corpus_len,
        };
        Some(start..end)
    }

    /// Build a table from raw starts, checking the same rules as [`parse`](Self::parse)
    ///
    /// Errors carry the 1-based position of the offending entry as `line`.
    pub fn from_starts(starts: impl IntoIterator<Item = TextPosition>) -> CorpusResult<Self> {
        let mut table = Self::new();
        for (idx, start) in starts.into_iter().enumerate() {
            table.checked_push(idx + 1, start)?;
        }
        Ok(table)
    }

    /// Parse the text form; blank lines are ignored
    pub fn parse(text: &str) -> CorpusResult<Self> {
        let mut table = Self::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let start: TextPosition = raw.parse().map_err(|_| CorpusError::InvalidOffsets {
                line,
                reason: format!("{:?} is not an unsigned integer", raw),
            })?;
            table.checked_push(line, start)?;
        }
        Ok(table)
    }

    /// Append `start` if it keeps the table valid
    fn checked_push(&mut self, line: usize, start: TextPosition) -> CorpusResult<()> {
        match self.starts.last() {
            None if start != 0 => {
                return Err(CorpusError::InvalidOffsets {
                    line,
                    reason: format!("first offset must be 0, got {}", start),
                });
            }
            Some(&prev) if start <= prev => {
                return Err(CorpusError::InvalidOffsets {
                    line,
                    reason: format!("{} does not increase over {}", start, prev),
                });
            }
            _ => {}
        }
        self.starts.push(start);
        Ok(())
    }

    pub fn load(path: &Path) -> CorpusResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
        Self::parse(&text)
    }

    /// Text form: every entry newline-terminated
    pub fn to_text(&self) -> String {
        render_lines(&self.starts)
    }

    /// Write the whole table in one go
    pub fn write(&self, path: &Path) -> CorpusResult<()> {
        fs::write(path, self.to_text()).map_err(|e| CorpusError::io(path, e))
    }
}

/// Read a ranks side file written next to an offset table
pub fn load_ranks(path: &Path) -> CorpusResult<Vec<Rank>> {
    let text = fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
    text.lines()
        .enumerate()
        .filter(|(_, raw)| !raw.trim().is_empty())
        .map(|(idx, raw)| {
            raw.trim().parse().map_err(|_| CorpusError::InvalidOffsets {
                line: idx + 1,
                reason: format!("{:?} is not a rank", raw.trim()),
            })
        })
        .collect()
}

/// One decimal number per line, newline-terminated
pub(crate) fn render_lines<T: std::fmt::Display>(values: &[T]) -> String {
    let mut out = String::with_capacity(values.len() * 8);
    for value in values {
        // Writing to a String cannot fail
        let _ = writeln!(out, "{}", value);
    }
    out
}
