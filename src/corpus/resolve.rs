//! Rank to file name resolution
//!
//! Two strategies exist because datasets are laid out two ways: either every
//! file follows an exact `{prefix}{rank}.{extension}` name, or only the
//! `{prefix}{rank}` stem is known and the directory has to be scanned.

use super::error::{CorpusError, CorpusResult};
use super::types::Rank;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Maps a rank to an existing file, or `None` when the rank is missing
pub trait FilenameResolver {
    fn resolve(&self, rank: Rank) -> CorpusResult<Option<PathBuf>>;

    /// Path reported when a rank is missing
    fn expected(&self, rank: Rank) -> PathBuf;
}

/// Configuration-level choice of resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// `{prefix}{rank}.{extension}`; an empty extension drops the dot
    Exact { prefix: String, extension: String },
    /// First directory entry (by name) starting with `{prefix}{rank}`
    PrefixScan { prefix: String },
}

impl ResolutionStrategy {
    pub fn validate(&self) -> CorpusResult<()> {
        let prefix = match self {
            ResolutionStrategy::Exact { prefix, extension } => {
                if extension.contains(['/', '\\']) {
                    return Err(CorpusError::invalid_config(format!(
                        "extension {:?} must not contain a path separator",
                        extension
                    )));
                }
                prefix
            }
            ResolutionStrategy::PrefixScan { prefix } => prefix,
        };
        if prefix.is_empty() {
            return Err(CorpusError::invalid_config("file name prefix is empty"));
        }
        if prefix.contains(['/', '\\']) {
            return Err(CorpusError::invalid_config(format!(
                "prefix {:?} must not contain a path separator",
                prefix
            )));
        }
        Ok(())
    }

    /// Instantiate the resolver for a dataset directory
    pub fn resolver(&self, dataset_dir: &Path) -> CorpusResult<Box<dyn FilenameResolver>> {
        let resolver: Box<dyn FilenameResolver> = match self {
            ResolutionStrategy::Exact { prefix, extension } => {
                Box::new(ExactTemplate::new(dataset_dir, prefix, extension))
            }
            ResolutionStrategy::PrefixScan { prefix } => {
                Box::new(PrefixScan::scan(dataset_dir, prefix)?)
            }
        };
        Ok(resolver)
    }
}

/// Single file-name lookup per rank
pub struct ExactTemplate {
    dir: PathBuf,
    prefix: String,
    extension: String,
}

impl ExactTemplate {
    pub fn new(dir: &Path, prefix: &str, extension: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            prefix: prefix.to_string(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }
}

impl FilenameResolver for ExactTemplate {
    fn resolve(&self, rank: Rank) -> CorpusResult<Option<PathBuf>> {
        let path = self.expected(rank);
        Ok(path.is_file().then_some(path))
    }

    fn expected(&self, rank: Rank) -> PathBuf {
        let name = if self.extension.is_empty() {
            format!("{}{}", self.prefix, rank)
        } else {
            format!("{}{}.{}", self.prefix, rank, self.extension)
        };
        self.dir.join(name)
    }
}

/// Prefix match against a sorted snapshot of the directory
///
/// The listing is taken once and sorted by name so the "first" match is the
/// same on every run.
///
/// Stricter than a bare `starts_with("{prefix}{rank}")`: the character after
/// the rank must not be another digit. With a plain prefix test a missing
/// `doc_1.xml` would silently resolve rank 1 to `doc_10.xml` and the same
/// document would be concatenated twice.
pub struct PrefixScan {
    dir: PathBuf,
    prefix: String,
    names: Vec<String>,
}

impl PrefixScan {
    pub fn scan(dir: &Path, prefix: &str) -> CorpusResult<Self> {
        let entries = fs::read_dir(dir).map_err(|e| CorpusError::io(dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CorpusError::io(dir, e))?;
            if !entry.path().is_file() {
                continue;
            }
            // Non UTF-8 names can never match a UTF-8 prefix
            if let Ok(name) = entry.file_name().into_string() {
                if name.starts_with(prefix) {
                    names.push(name);
                }
            }
        }
        names.sort_unstable();

        Ok(Self {
            dir: dir.to_path_buf(),
            prefix: prefix.to_string(),
            names,
        })
    }
}

impl FilenameResolver for PrefixScan {
    fn resolve(&self, rank: Rank) -> CorpusResult<Option<PathBuf>> {
        let stem = format!("{}{}", self.prefix, rank);
        let found = self.names.iter().find(|name| {
            name.strip_prefix(stem.as_str())
                .is_some_and(|rest| !rest.starts_with(|c: char| c.is_ascii_digit()))
        });
        Ok(found.map(|name| self.dir.join(name)))
    }

    fn expected(&self, rank: Rank) -> PathBuf {
        self.dir.join(format!("{}{}*", self.prefix, rank))
    }
}
