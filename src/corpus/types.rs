//! Types for corpus assembly
//!
//! Configuration is always an explicit [`BuildConfig`] value handed to the
//! builder; nothing is read from process-wide state.

use super::error::{CorpusError, CorpusResult};
use super::offsets::OffsetTable;
use super::resolve::ResolutionStrategy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Position in the corpus byte stream
pub type TextPosition = u64;

/// 1-based document rank
pub type Rank = u32;

/// Single byte written between adjacent documents
///
/// Only ASCII is accepted so the byte and the configured character agree.
/// Documents containing the byte are passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Delimiter(u8);

impl Delimiter {
    pub fn new(c: char) -> CorpusResult<Self> {
        if c.is_ascii() {
            Ok(Self(c as u8))
        } else {
            Err(CorpusError::invalid_config(format!(
                "delimiter {:?} is not a single ASCII byte",
                c
            )))
        }
    }

    pub fn byte(self) -> u8 {
        self.0
    }
}

impl FromStr for Delimiter {
    type Err = CorpusError;

    fn from_str(s: &str) -> CorpusResult<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(c),
            _ => Err(CorpusError::invalid_config(format!(
                "delimiter must be exactly one character, got {:?}",
                s
            ))),
        }
    }
}

impl TryFrom<String> for Delimiter {
    type Error = CorpusError;

    fn try_from(s: String) -> CorpusResult<Self> {
        s.parse()
    }
}

impl From<Delimiter> for String {
    fn from(d: Delimiter) -> Self {
        (d.0 as char).to_string()
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", (self.0 as char).escape_default())
    }
}

/// Everything one corpus build needs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory holding the document files
    pub dataset_dir: PathBuf,
    /// Number of ranks to process (1..=document_count)
    pub document_count: Rank,
    /// How a rank becomes a file name
    pub strategy: ResolutionStrategy,
    pub delimiter: Delimiter,
    /// Destination of the concatenated bytes
    pub corpus_path: PathBuf,
    /// Destination of the offset table
    pub offsets_path: PathBuf,
    /// Optional side file mapping each concatenated document to its rank
    #[serde(default)]
    pub ranks_path: Option<PathBuf>,
    /// Fail the run if any rank is missing
    #[serde(default)]
    pub strict: bool,
}

impl BuildConfig {
    /// Reject a configuration before any I/O happens
    pub fn validate(&self) -> CorpusResult<()> {
        if self.document_count == 0 {
            return Err(CorpusError::invalid_config(
                "document count must be positive",
            ));
        }
        if self.dataset_dir.as_os_str().is_empty() {
            return Err(CorpusError::invalid_config("dataset directory is empty"));
        }
        if self.corpus_path.as_os_str().is_empty() {
            return Err(CorpusError::invalid_config("corpus output path is empty"));
        }
        if self.offsets_path.as_os_str().is_empty() {
            return Err(CorpusError::invalid_config("offsets output path is empty"));
        }
        if self.corpus_path == self.offsets_path {
            return Err(CorpusError::invalid_config(
                "corpus and offsets output paths must differ",
            ));
        }
        if let Some(ranks) = &self.ranks_path {
            if ranks == &self.corpus_path || ranks == &self.offsets_path {
                return Err(CorpusError::invalid_config(
                    "ranks output path must differ from the other outputs",
                ));
            }
        }
        self.strategy.validate()?;
        if !self.dataset_dir.is_dir() {
            return Err(CorpusError::invalid_config(format!(
                "dataset directory does not exist: {}",
                self.dataset_dir.display()
            )));
        }
        Ok(())
    }

    /// Resolve relative paths against `base` (used for manifests)
    pub fn rebase(mut self, base: &Path) -> Self {
        let join = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.dataset_dir = join(self.dataset_dir);
        self.corpus_path = join(self.corpus_path);
        self.offsets_path = join(self.offsets_path);
        self.ranks_path = self.ranks_path.map(join);
        self
    }
}

/// Outcome of a completed build
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Start of every concatenated document
    pub offsets: OffsetTable,
    /// Nominal rank of every concatenated document, aligned with `offsets`
    pub ranks: Vec<Rank>,
    /// Ranks that could not be resolved, ascending
    pub missing: Vec<Rank>,
    /// Final corpus length in bytes
    pub corpus_len: TextPosition,
    /// Number of ranks that were requested
    pub requested: Rank,
}

impl BuildReport {
    pub fn documents_written(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}
