//! # doccat - Corpus Assembly for String Indexes
//!
//! doccat concatenates a ranked set of document files into one delimited byte
//! stream and records the exact byte offset at which every document starts.
//! Suffix-array and FM-index tools build over the corpus and use the offsets
//! to attribute a match back to its document.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`corpus`] - Rank resolution, streaming concatenation, offsets, verification
//! - [`config`] - JSON manifests describing several datasets
//! - [`output`] - Human-readable CLI reports
//! - [`logging`] - `tracing` subscriber setup
//! - [`utils`] - Progress bars and formatting helpers
//!
//! ## Quick Start
//!
//! ```no_run
//! use doccat::corpus::{BuildConfig, CorpusBuilder, Delimiter, ResolutionStrategy};
//! use std::path::PathBuf;
//!
//! let config = BuildConfig {
//!     dataset_dir: PathBuf::from("datasets/dblp"),
//!     document_count: 10,
//!     strategy: ResolutionStrategy::Exact {
//!         prefix: "dblp5MB_".to_string(),
//!         extension: "xml".to_string(),
//!     },
//!     delimiter: Delimiter::new('$').unwrap(),
//!     corpus_path: PathBuf::from("corpus_T.txt"),
//!     offsets_path: PathBuf::from("posiciones.txt"),
//!     ranks_path: None,
//!     strict: false,
//! };
//!
//! let report = CorpusBuilder::new(config).unwrap().build().unwrap();
//! println!("{} documents, {} bytes", report.documents_written(), report.corpus_len);
//! ```
//!
//! ## Layout
//!
//! For documents `D1..Dn` and delimiter `$` the corpus is `D1$D2$...$Dn`.
//! Missing ranks are skipped entirely, so offsets always describe byte
//! positions in the file actually written, never nominal rank positions.

pub mod config;
pub mod corpus;
pub mod logging;
pub mod output;
pub mod utils;
