//! Error types for corpus assembly

use crate::corpus::types::Rank;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or reading a corpus
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Rejected before any file is touched
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No file could be resolved for a rank
    #[error("Missing input for rank {rank}: {}", .path.display())]
    MissingInput { rank: Rank, path: PathBuf },

    /// Several ranks were skipped in a strict run
    #[error("{} of {total} documents missing (ranks {})", .ranks.len(), format_ranks(.ranks))]
    MissingRanks { ranks: Vec<Rank>, total: Rank },

    /// Reading a document or writing the corpus failed part way through
    #[error("Failed to append rank {rank} ({}): {source}", .path.display())]
    Append {
        rank: Rank,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O failure, tagged with the path involved
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Offsets file that does not parse or is not strictly increasing
    #[error("Invalid offsets at line {line}: {reason}")]
    InvalidOffsets { line: usize, reason: String },

    /// Corpus and offsets disagree with each other
    #[error("Corpus does not match offsets: {0}")]
    Inconsistent(String),

    /// Dataset manifest could not be read or parsed
    #[error("Manifest error: {0}")]
    Manifest(String),
}

impl CorpusError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CorpusError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        CorpusError::InvalidConfiguration(msg.into())
    }
}

impl From<serde_json::Error> for CorpusError {
    fn from(err: serde_json::Error) -> Self {
        CorpusError::Manifest(err.to_string())
    }
}

/// Compact rank list for messages: "2, 5, 9" or "2, 5, 9, ... (+12 more)"
fn format_ranks(ranks: &[Rank]) -> String {
    const SHOWN: usize = 10;
    let mut out = ranks
        .iter()
        .take(SHOWN)
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if ranks.len() > SHOWN {
        out.push_str(&format!(", ... (+{} more)", ranks.len() - SHOWN));
    }
    out
}

/// Result type alias for corpus operations
pub type CorpusResult<T> = Result<T, CorpusError>;
