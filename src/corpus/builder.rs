//! Corpus builder
//!
//! Streams documents into the corpus file strictly in rank order:
//! 1. Resolve every rank to a file (or mark it missing)
//! 2. Append each found document, preceded by the delimiter unless it is first
//! 3. Write the offset table (and optional ranks file) once at the end
//!
//! Only one document is in flight at a time and it is copied through a fixed
//! buffer, so memory does not grow with the corpus.

use super::error::{CorpusError, CorpusResult};
use super::offsets::{OffsetTable, render_lines};
use super::types::{BuildConfig, BuildReport, Delimiter, Rank, TextPosition};
use crate::utils::progress::rank_progress;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Output buffer size for the corpus stream
const WRITE_BUFFER_SIZE: usize = 65536;

/// Delimited concatenation over any byte sink
///
/// Tracks the stream position itself, so offsets never depend on seeking.
pub struct CorpusWriter<W: Write> {
    inner: W,
    delimiter: Delimiter,
    offsets: OffsetTable,
    position: TextPosition,
}

impl<W: Write> CorpusWriter<W> {
    pub fn new(inner: W, delimiter: Delimiter) -> Self {
        Self {
            inner,
            delimiter,
            offsets: OffsetTable::new(),
            position: 0,
        }
    }

    /// Append one document and return the position of its first byte
    pub fn append<R: Read + ?Sized>(&mut self, document: &mut R) -> io::Result<TextPosition> {
        if !self.offsets.is_empty() {
            self.inner.write_all(&[self.delimiter.byte()])?;
            self.position += 1;
        }

        let start = self.position;
        self.position += io::copy(document, &mut self.inner)?;
        self.offsets.push(start);
        Ok(start)
    }

    /// Bytes written so far
    pub fn position(&self) -> TextPosition {
        self.position
    }

    pub fn offsets(&self) -> &OffsetTable {
        &self.offsets
    }

    /// Flush and hand back the sink with the finished offset table
    pub fn finish(mut self) -> io::Result<(W, OffsetTable)> {
        self.inner.flush()?;
        Ok((self.inner, self.offsets))
    }
}

/// Builds one corpus from a validated configuration
pub struct CorpusBuilder {
    config: BuildConfig,
    show_progress: bool,
}

impl CorpusBuilder {
    /// Validate the configuration; no file is created yet
    pub fn new(config: BuildConfig) -> CorpusResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            show_progress: false,
        })
    }

    /// Show a progress bar on stderr while building
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Run the build, overwriting any previous outputs
    pub fn build(&self) -> CorpusResult<BuildReport> {
        let plan = self.resolve_all()?;
        self.build_from_plan(plan)
    }

    /// Stream an already resolved plan into the outputs
    fn build_from_plan(&self, plan: Vec<(Rank, Option<PathBuf>)>) -> CorpusResult<BuildReport> {
        let cfg = &self.config;

        let mut missing: Vec<Rank> = plan
            .iter()
            .filter(|(_, path)| path.is_none())
            .map(|&(rank, _)| rank)
            .collect();

        if cfg.strict && !missing.is_empty() {
            return Err(CorpusError::MissingRanks {
                ranks: missing,
                total: cfg.document_count,
            });
        }

        info!(
            dataset = %cfg.dataset_dir.display(),
            documents = cfg.document_count,
            delimiter = %cfg.delimiter,
            corpus = %cfg.corpus_path.display(),
            "Concatenating documents"
        );

        let file = File::create(&cfg.corpus_path).map_err(|e| CorpusError::io(&cfg.corpus_path, e))?;
        let mut writer = CorpusWriter::new(BufWriter::with_capacity(WRITE_BUFFER_SIZE, file), cfg.delimiter);
        let mut ranks = Vec::with_capacity(plan.len());

        let progress = rank_progress(cfg.document_count as u64, self.show_progress);

        for (rank, path) in plan {
            if let Some(ref pb) = progress {
                pb.inc(1);
            }

            let Some(path) = path else {
                continue;
            };

            let mut document = match File::open(&path) {
                Ok(f) => f,
                // Removed between resolution and open
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!(rank, path = %path.display(), "Document vanished, skipping");
                    missing.push(rank);
                    continue;
                }
                Err(e) => return Err(CorpusError::io(&path, e)),
            };

            let start = writer
                .append(&mut document)
                .map_err(|source| CorpusError::Append {
                    rank,
                    path: path.clone(),
                    source,
                })?;
            ranks.push(rank);

            debug!(rank, start, path = %path.display(), "Appended document");
        }

        let corpus_len = writer.position();
        let (_, offsets) = writer
            .finish()
            .map_err(|e| CorpusError::io(&cfg.corpus_path, e))?;

        if let Some(pb) = progress {
            pb.finish_with_message(format!("{} documents, {} bytes", offsets.len(), corpus_len));
        }

        offsets.write(&cfg.offsets_path)?;
        if let Some(ranks_path) = &cfg.ranks_path {
            fs::write(ranks_path, render_lines(&ranks)).map_err(|e| CorpusError::io(ranks_path, e))?;
        }

        missing.sort_unstable();

        // A document can still vanish after resolution
        if cfg.strict && !missing.is_empty() {
            return Err(CorpusError::MissingRanks {
                ranks: missing,
                total: cfg.document_count,
            });
        }

        info!(
            written = offsets.len(),
            missing = missing.len(),
            bytes = corpus_len,
            "Corpus complete"
        );

        Ok(BuildReport {
            offsets,
            ranks,
            missing,
            corpus_len,
            requested: cfg.document_count,
        })
    }

    /// Resolve ranks 1..=N in order, logging each missing one
    fn resolve_all(&self) -> CorpusResult<Vec<(Rank, Option<PathBuf>)>> {
        let cfg = &self.config;
        let resolver = cfg.strategy.resolver(&cfg.dataset_dir)?;

        let mut plan = Vec::with_capacity(cfg.document_count as usize);
        for rank in 1..=cfg.document_count {
            let path = resolver.resolve(rank)?;
            if path.is_none() {
                let err = CorpusError::MissingInput {
                    rank,
                    path: resolver.expected(rank),
                };
                warn!(%err, "Skipping rank");
            }
            plan.push((rank, path));
        }
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::resolve::ResolutionStrategy;
    use std::path::Path;
    use tempfile::{TempDir, tempdir};

    fn delim() -> Delimiter {
        Delimiter::new('$').unwrap()
    }

    fn setup_dataset(docs: &[(&str, &[u8])]) -> TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("data")).unwrap();
        for (name, content) in docs {
            fs::write(dir.path().join("data").join(name), content).unwrap();
        }
        dir
    }

    fn config(root: &Path, count: Rank) -> BuildConfig {
        BuildConfig {
            dataset_dir: root.join("data"),
            document_count: count,
            strategy: ResolutionStrategy::Exact {
                prefix: "doc_".to_string(),
                extension: "txt".to_string(),
            },
            delimiter: delim(),
            corpus_path: root.join("corpus.txt"),
            offsets_path: root.join("offsets.txt"),
            ranks_path: None,
            strict: false,
        }
    }

    fn run(cfg: BuildConfig) -> (BuildReport, Vec<u8>, String) {
        let corpus_path = cfg.corpus_path.clone();
        let offsets_path = cfg.offsets_path.clone();
        let report = CorpusBuilder::new(cfg).unwrap().build().unwrap();
        (
            report,
            fs::read(corpus_path).unwrap(),
            fs::read_to_string(offsets_path).unwrap(),
        )
    }

    #[test]
    fn test_writer_in_memory() {
        let mut w = CorpusWriter::new(Vec::new(), delim());
        assert_eq!(w.append(&mut &b"AB"[..]).unwrap(), 0);
        assert_eq!(w.append(&mut &b"CDE"[..]).unwrap(), 3);
        assert_eq!(w.append(&mut &b"F"[..]).unwrap(), 7);
        assert_eq!(w.position(), 8);

        let (bytes, offsets) = w.finish().unwrap();
        assert_eq!(bytes, b"AB$CDE$F");
        assert_eq!(offsets.as_slice(), &[0, 3, 7]);
    }

    #[test]
    fn test_writer_empty_documents() {
        let mut w = CorpusWriter::new(Vec::new(), delim());
        w.append(&mut &b""[..]).unwrap();
        w.append(&mut &b""[..]).unwrap();
        w.append(&mut &b"x"[..]).unwrap();

        let (bytes, offsets) = w.finish().unwrap();
        assert_eq!(bytes, b"$$x");
        assert_eq!(offsets.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn test_build_three_documents() {
        let dir = setup_dataset(&[
            ("doc_1.txt", b"AB"),
            ("doc_2.txt", b"CDE"),
            ("doc_3.txt", b"F"),
        ]);
        let (report, corpus, offsets) = run(config(dir.path(), 3));

        assert_eq!(corpus, b"AB$CDE$F");
        assert_eq!(offsets, "0\n3\n7\n");
        assert_eq!(report.corpus_len, 8);
        assert_eq!(report.documents_written(), 3);
        assert_eq!(report.ranks, vec![1, 2, 3]);
        assert!(report.is_complete());
    }

    #[test]
    fn test_build_skips_missing_rank() {
        let dir = setup_dataset(&[("doc_1.txt", b"AB"), ("doc_3.txt", b"F")]);
        let (report, corpus, offsets) = run(config(dir.path(), 3));

        assert_eq!(corpus, b"AB$F");
        assert_eq!(offsets, "0\n3\n");
        assert_eq!(report.missing, vec![2]);
        assert_eq!(report.ranks, vec![1, 3]);
        assert_eq!(report.corpus_len, 4);
    }

    #[test]
    fn test_build_missing_last_rank_has_no_trailing_delimiter() {
        let dir = setup_dataset(&[("doc_1.txt", b"AB"), ("doc_2.txt", b"CDE")]);
        let (report, corpus, offsets) = run(config(dir.path(), 3));

        assert_eq!(corpus, b"AB$CDE");
        assert_eq!(offsets, "0\n3\n");
        assert_eq!(report.missing, vec![3]);
    }

    #[test]
    fn test_build_missing_first_rank() {
        let dir = setup_dataset(&[("doc_2.txt", b"CDE"), ("doc_3.txt", b"F")]);
        let (report, corpus, offsets) = run(config(dir.path(), 3));

        assert_eq!(corpus, b"CDE$F");
        assert_eq!(offsets, "0\n4\n");
        assert_eq!(report.missing, vec![1]);
    }

    #[test]
    fn test_build_single_document() {
        let dir = setup_dataset(&[("doc_1.txt", b"X")]);
        let (report, corpus, offsets) = run(config(dir.path(), 1));

        assert_eq!(corpus, b"X");
        assert_eq!(offsets, "0\n");
        assert_eq!(report.corpus_len, 1);
    }

    #[test]
    fn test_build_all_missing() {
        let dir = setup_dataset(&[]);
        let (report, corpus, offsets) = run(config(dir.path(), 4));

        assert!(corpus.is_empty());
        assert!(offsets.is_empty());
        assert_eq!(report.missing, vec![1, 2, 3, 4]);
        assert_eq!(report.documents_written(), 0);
    }

    #[test]
    fn test_delimiter_inside_document_passes_through() {
        // Known limitation: the delimiter is neither escaped nor stripped
        let dir = setup_dataset(&[("doc_1.txt", b"A$B"), ("doc_2.txt", b"C")]);
        let (_, corpus, offsets) = run(config(dir.path(), 2));

        assert_eq!(corpus, b"A$B$C");
        assert_eq!(offsets, "0\n4\n");
    }

    #[test]
    fn test_binary_content_is_untouched() {
        let blob: Vec<u8> = (0..=255u8).collect();
        let dir = setup_dataset(&[("doc_1.txt", &blob), ("doc_2.txt", b"\r\n")]);
        let (_, corpus, offsets) = run(config(dir.path(), 2));

        assert_eq!(&corpus[..256], &blob[..]);
        assert_eq!(&corpus[256..], b"$\r\n");
        assert_eq!(offsets, "0\n257\n");
    }

    #[test]
    fn test_ranks_file() {
        let dir = setup_dataset(&[("doc_1.txt", b"AB"), ("doc_3.txt", b"F")]);
        let mut cfg = config(dir.path(), 3);
        cfg.ranks_path = Some(dir.path().join("ranks.txt"));
        run(cfg);

        assert_eq!(
            fs::read_to_string(dir.path().join("ranks.txt")).unwrap(),
            "1\n3\n"
        );
    }

    #[test]
    fn test_strict_fails_before_writing() {
        let dir = setup_dataset(&[("doc_1.txt", b"AB")]);
        let mut cfg = config(dir.path(), 2);
        cfg.strict = true;

        let err = CorpusBuilder::new(cfg).unwrap().build().unwrap_err();
        assert!(matches!(err, CorpusError::MissingRanks { ref ranks, total: 2 } if ranks == &[2]));
        assert!(!dir.path().join("corpus.txt").exists());
    }

    #[test]
    fn test_strict_fails_when_document_vanishes() {
        let dir = setup_dataset(&[("doc_1.txt", b"AB"), ("doc_2.txt", b"CDE")]);
        let mut cfg = config(dir.path(), 2);
        cfg.strict = true;

        let builder = CorpusBuilder::new(cfg).unwrap();
        let plan = builder.resolve_all().unwrap();
        fs::remove_file(dir.path().join("data").join("doc_2.txt")).unwrap();

        let err = builder.build_from_plan(plan).unwrap_err();
        assert!(matches!(err, CorpusError::MissingRanks { ref ranks, total: 2 } if ranks == &[2]));
    }

    #[test]
    fn test_vanished_document_is_skipped_when_not_strict() {
        let dir = setup_dataset(&[("doc_1.txt", b"AB"), ("doc_2.txt", b"CDE")]);
        let builder = CorpusBuilder::new(config(dir.path(), 2)).unwrap();
        let plan = builder.resolve_all().unwrap();
        fs::remove_file(dir.path().join("data").join("doc_1.txt")).unwrap();

        let report = builder.build_from_plan(plan).unwrap();
        assert_eq!(report.missing, vec![1]);
        assert_eq!(fs::read(dir.path().join("corpus.txt")).unwrap(), b"CDE");
    }

    #[test]
    fn test_prefix_scan_strategy() {
        let dir = setup_dataset(&[
            ("proteins5MB_1.xml", b"MKV"),
            ("proteins5MB_2.xml", b"LLA"),
        ]);
        let mut cfg = config(dir.path(), 2);
        cfg.strategy = ResolutionStrategy::PrefixScan {
            prefix: "proteins5MB_".to_string(),
        };
        let (_, corpus, offsets) = run(cfg);

        assert_eq!(corpus, b"MKV$LLA");
        assert_eq!(offsets, "0\n4\n");
    }

    #[test]
    fn test_rebuild_overwrites_and_is_identical() {
        let dir = setup_dataset(&[("doc_1.txt", b"AB"), ("doc_2.txt", b"CDE")]);
        fs::write(dir.path().join("corpus.txt"), b"stale content that is longer").unwrap();

        let (_, first_corpus, first_offsets) = run(config(dir.path(), 2));
        let (_, second_corpus, second_offsets) = run(config(dir.path(), 2));

        assert_eq!(first_corpus, b"AB$CDE");
        assert_eq!(first_corpus, second_corpus);
        assert_eq!(first_offsets, second_offsets);
    }

    #[test]
    fn test_invalid_config_creates_nothing() {
        let dir = setup_dataset(&[("doc_1.txt", b"AB")]);
        let cfg = config(dir.path(), 0);

        assert!(matches!(
            CorpusBuilder::new(cfg),
            Err(CorpusError::InvalidConfiguration(_))
        ));
        assert!(!dir.path().join("corpus.txt").exists());
    }

    #[test]
    fn test_unwritable_destination_is_fatal() {
        let dir = setup_dataset(&[("doc_1.txt", b"AB")]);
        let mut cfg = config(dir.path(), 1);
        cfg.corpus_path = dir.path().join("no_such_dir").join("corpus.txt");

        let err = CorpusBuilder::new(cfg).unwrap().build().unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }
}
