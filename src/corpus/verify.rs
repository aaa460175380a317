//! Corpus verification
//!
//! Re-reads a corpus/offsets pair and checks that every offset lands on the
//! first byte of a document: offsets start at 0, strictly increase, stay
//! inside the corpus, and each one (after the first) directly follows a
//! delimiter byte.

use super::error::{CorpusError, CorpusResult};
use super::offsets::OffsetTable;
use super::types::{Delimiter, TextPosition};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// Summary of a verified corpus
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub corpus_len: TextPosition,
    pub documents: usize,
    /// Delimiter bytes anywhere in the corpus
    pub delimiter_count: usize,
    /// Documents (0-based) whose own bytes contain the delimiter
    pub contaminated: Vec<usize>,
    pub shortest: Option<TextPosition>,
    pub longest: Option<TextPosition>,
}

impl VerifyReport {
    /// True when the delimiter only appears between documents
    pub fn is_clean(&self) -> bool {
        self.contaminated.is_empty()
    }
}

/// Verify files on disk
pub fn verify_corpus(
    corpus_path: &Path,
    offsets_path: &Path,
    delimiter: Delimiter,
) -> CorpusResult<VerifyReport> {
    let offsets = OffsetTable::load(offsets_path)?;

    let file = File::open(corpus_path).map_err(|e| CorpusError::io(corpus_path, e))?;
    let len = file
        .metadata()
        .map_err(|e| CorpusError::io(corpus_path, e))?
        .len();

    // Zero-length files cannot be mapped
    if len == 0 {
        return verify_bytes(&[], &offsets, delimiter);
    }

    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| CorpusError::io(corpus_path, e))?;
    verify_bytes(&mmap, &offsets, delimiter)
}

/// Verify an in-memory corpus against its offsets
pub fn verify_bytes(
    corpus: &[u8],
    offsets: &OffsetTable,
    delimiter: Delimiter,
) -> CorpusResult<VerifyReport> {
    let corpus_len = corpus.len() as TextPosition;
    let delim = delimiter.byte();

    if offsets.is_empty() {
        if corpus_len != 0 {
            return Err(CorpusError::Inconsistent(format!(
                "no offsets for a {} byte corpus",
                corpus_len
            )));
        }
        return Ok(VerifyReport::default());
    }

    let starts = offsets.as_slice();
    let last = starts[starts.len() - 1];
    if last > corpus_len {
        return Err(CorpusError::Inconsistent(format!(
            "last offset {} is past the end of a {} byte corpus",
            last, corpus_len
        )));
    }

    for (index, &start) in starts.iter().enumerate().skip(1) {
        let before = corpus[(start - 1) as usize];
        if before != delim {
            return Err(CorpusError::Inconsistent(format!(
                "document {} starts at {} but byte {} is {:#04x}, not the delimiter",
                index,
                start,
                start - 1,
                before
            )));
        }
    }

    let mut report = VerifyReport {
        corpus_len,
        documents: offsets.len(),
        delimiter_count: memchr::memchr_iter(delim, corpus).count(),
        ..VerifyReport::default()
    };

    for index in 0..offsets.len() {
        let Some(span) = offsets.document_span(index, corpus_len) else {
            break;
        };
        let doc = &corpus[span.start as usize..span.end as usize];
        let size = doc.len() as TextPosition;

        report.shortest = Some(report.shortest.map_or(size, |s| s.min(size)));
        report.longest = Some(report.longest.map_or(size, |l| l.max(size)));

        if memchr::memchr(delim, doc).is_some() {
            warn!(document = index, "Document contains the delimiter byte");
            report.contaminated.push(index);
        }
    }

    debug!(
        documents = report.documents,
        delimiters = report.delimiter_count,
        "Corpus verified"
    );
    Ok(report)
}
