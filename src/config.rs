//! Dataset manifest
//!
//! A JSON file describing several corpus builds. Each dataset carries its own
//! [`BuildConfig`]; relative paths are resolved against the manifest's
//! directory so a manifest can be run from anywhere.
//!
//! ```json
//! {
//!   "datasets": [
//!     {
//!       "name": "dblp",
//!       "build": {
//!         "dataset_dir": "datasets/dblp",
//!         "document_count": 10,
//!         "strategy": { "kind": "exact", "prefix": "dblp5MB_", "extension": "xml" },
//!         "delimiter": "$",
//!         "corpus_path": "corpus_T.txt",
//!         "offsets_path": "posiciones.txt"
//!       }
//!     }
//!   ]
//! }
//! ```

use crate::corpus::{BuildConfig, CorpusError, CorpusResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// One named build in a manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    pub name: String,
    pub build: BuildConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub datasets: Vec<Dataset>,
}

impl Manifest {
    /// Load a manifest and rebase its paths onto the manifest's directory
    pub fn load(path: &Path) -> CorpusResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
        let manifest = Self::parse(&content)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self {
            datasets: manifest
                .datasets
                .into_iter()
                .map(|d| Dataset {
                    name: d.name,
                    build: d.build.rebase(base),
                })
                .collect(),
        })
    }

    /// Parse manifest JSON; paths are left as written
    pub fn parse(content: &str) -> CorpusResult<Self> {
        let manifest: Manifest = serde_json::from_str(content)?;

        if manifest.datasets.is_empty() {
            return Err(CorpusError::Manifest("no datasets listed".to_string()));
        }

        let mut seen = HashSet::new();
        for dataset in &manifest.datasets {
            if dataset.name.trim().is_empty() {
                return Err(CorpusError::Manifest("dataset name is empty".to_string()));
            }
            if !seen.insert(dataset.name.as_str()) {
                return Err(CorpusError::Manifest(format!(
                    "duplicate dataset name {:?}",
                    dataset.name
                )));
            }
        }

        Ok(manifest)
    }

    /// Datasets to run, optionally narrowed to one name
    pub fn select(&self, only: Option<&str>) -> CorpusResult<Vec<&Dataset>> {
        match only {
            None => Ok(self.datasets.iter().collect()),
            Some(name) => self
                .datasets
                .iter()
                .find(|d| d.name == name)
                .map(|d| vec![d])
                .ok_or_else(|| CorpusError::Manifest(format!("no dataset named {:?}", name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::ResolutionStrategy;
    use std::path::PathBuf;
    use tempfile::tempdir;

    const MANIFEST: &str = r#"{
        "datasets": [
            {
                "name": "dblp",
                "build": {
                    "dataset_dir": "datasets/dblp",
                    "document_count": 10,
                    "strategy": { "kind": "exact", "prefix": "dblp5MB_", "extension": "xml" },
                    "delimiter": "$",
                    "corpus_path": "corpus_T.txt",
                    "offsets_path": "posiciones.txt"
                }
            },
            {
                "name": "sources",
                "build": {
                    "dataset_dir": "/abs/sources",
                    "document_count": 10,
                    "strategy": { "kind": "prefix_scan", "prefix": "sources5MB_" },
                    "delimiter": "$",
                    "corpus_path": "corpus_T2.txt",
                    "offsets_path": "posiciones2.txt",
                    "ranks_path": "ranks2.txt",
                    "strict": true
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_manifest() {
        let m = Manifest::parse(MANIFEST).unwrap();
        assert_eq!(m.datasets.len(), 2);

        let dblp = &m.datasets[0].build;
        assert_eq!(dblp.document_count, 10);
        assert_eq!(dblp.delimiter.byte(), b'$');
        assert!(!dblp.strict);
        assert!(dblp.ranks_path.is_none());

        let sources = &m.datasets[1].build;
        assert!(sources.strict);
        assert!(matches!(
            sources.strategy,
            ResolutionStrategy::PrefixScan { .. }
        ));
    }

    #[test]
    fn test_load_rebases_relative_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("datasets.json");
        fs::write(&path, MANIFEST).unwrap();

        let m = Manifest::load(&path).unwrap();
        assert_eq!(m.datasets[0].build.dataset_dir, dir.path().join("datasets/dblp"));
        assert_eq!(m.datasets[0].build.corpus_path, dir.path().join("corpus_T.txt"));
        assert_eq!(m.datasets[1].build.dataset_dir, PathBuf::from("/abs/sources"));
    }

    #[test]
    fn test_rejects_bad_manifests() {
        assert!(Manifest::parse(r#"{"datasets": []}"#).is_err());
        assert!(Manifest::parse("not json").is_err());

        // Delimiter longer than one byte
        let bad = MANIFEST.replacen(r#""delimiter": "$""#, r#""delimiter": "$$""#, 1);
        assert!(Manifest::parse(&bad).is_err());

        // Unknown field
        let bad = MANIFEST.replacen(r#""document_count": 10"#, r#""document_count": 10, "extra": 1"#, 1);
        assert!(Manifest::parse(&bad).is_err());

        // Duplicate name
        let bad = MANIFEST.replacen(r#""name": "sources""#, r#""name": "dblp""#, 1);
        assert!(matches!(Manifest::parse(&bad), Err(CorpusError::Manifest(_))));
    }

    #[test]
    fn test_select() {
        let m = Manifest::parse(MANIFEST).unwrap();
        assert_eq!(m.select(None).unwrap().len(), 2);
        assert_eq!(m.select(Some("sources")).unwrap()[0].name, "sources");
        assert!(m.select(Some("proteins")).is_err());
    }
}
