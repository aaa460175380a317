//! Corpus assembly
//!
//! Concatenates a ranked collection of documents into a single byte stream
//! and records where each document starts in it.
//!
//! ## Architecture
//!
//! - `resolve`: Maps a document rank to a file in the dataset directory
//! - `builder`: Streams documents into the corpus file in rank order
//! - `offsets`: The offset table, its text format and position lookups
//! - `verify`: Re-checks a corpus/offsets pair already on disk
//! - `types`: Configuration and report types
//!
//! ## File Format
//!
//! Per run, two files are created (plus an optional third):
//! - corpus: `doc1 $ doc2 $ ... $ docN`, raw bytes, no header, no trailing delimiter
//! - offsets: one decimal start position per line, first line `0`
//! - ranks (optional): the nominal rank of each concatenated document, aligned
//!   line by line with the offsets file

pub mod builder;
pub mod error;
pub mod offsets;
pub mod resolve;
pub mod types;
pub mod verify;

// Re-exports for convenience
pub use builder::{CorpusBuilder, CorpusWriter};
pub use error::{CorpusError, CorpusResult};
pub use offsets::{OffsetTable, load_ranks};
pub use resolve::{ExactTemplate, FilenameResolver, PrefixScan, ResolutionStrategy};
pub use types::{BuildConfig, BuildReport, Delimiter, Rank, TextPosition};
pub use verify::{VerifyReport, verify_bytes, verify_corpus};
