use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use doccat::config::Manifest;
use doccat::corpus::{
    BuildConfig, CorpusBuilder, Delimiter, OffsetTable, ResolutionStrategy, TextPosition,
    load_ranks, verify_corpus,
};
use doccat::{logging, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "doccat")]
#[command(about = "Concatenate ranked documents into a delimited corpus with an offset table")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one corpus from command-line options
    Build(BuildArgs),
    /// Build every dataset listed in a JSON manifest
    Batch {
        /// Path to the manifest
        manifest: PathBuf,

        /// Only build the dataset with this name
        #[arg(long)]
        only: Option<String>,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },
    /// Check a corpus against its offsets file
    Verify {
        #[arg(long)]
        corpus: PathBuf,

        #[arg(long)]
        offsets: PathBuf,

        /// Delimiter the corpus was built with
        #[arg(short, long)]
        delimiter: Delimiter,
    },
    /// Map corpus byte positions to the document that owns them
    Locate {
        #[arg(long)]
        corpus: PathBuf,

        #[arg(long)]
        offsets: PathBuf,

        /// Ranks file written by `build --ranks-output`
        #[arg(long)]
        ranks: Option<PathBuf>,

        /// 0-based byte positions
        #[arg(required = true)]
        positions: Vec<TextPosition>,
    },
}

#[derive(Args)]
struct BuildArgs {
    /// Directory holding the documents
    #[arg(long)]
    dir: PathBuf,

    /// File name prefix, followed by the rank
    #[arg(long)]
    prefix: String,

    /// Extension of `{prefix}{rank}.{extension}` names
    #[arg(long, default_value = "xml", conflicts_with = "prefix_scan")]
    extension: String,

    /// Take the first file starting with `{prefix}{rank}` instead of an exact name
    #[arg(long)]
    prefix_scan: bool,

    /// Single ASCII byte written between documents
    #[arg(short, long)]
    delimiter: Delimiter,

    /// Number of documents (ranks 1..=N)
    #[arg(short = 'n', long)]
    count: u32,

    /// Corpus output file
    #[arg(long)]
    corpus: PathBuf,

    /// Offsets output file
    #[arg(long)]
    offsets: PathBuf,

    /// Also write the rank of each concatenated document
    #[arg(long)]
    ranks_output: Option<PathBuf>,

    /// Fail without writing anything if a rank is missing
    #[arg(long)]
    strict: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

impl BuildArgs {
    fn into_config(self) -> BuildConfig {
        let strategy = if self.prefix_scan {
            ResolutionStrategy::PrefixScan {
                prefix: self.prefix,
            }
        } else {
            ResolutionStrategy::Exact {
                prefix: self.prefix,
                extension: self.extension,
            }
        };

        BuildConfig {
            dataset_dir: self.dir,
            document_count: self.count,
            strategy,
            delimiter: self.delimiter,
            corpus_path: self.corpus,
            offsets_path: self.offsets,
            ranks_path: self.ranks_output,
            strict: self.strict,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let color = !cli.no_color;

    match cli.command {
        Commands::Build(args) => {
            let quiet = args.quiet;
            let report = CorpusBuilder::new(args.into_config())?
                .with_progress(!quiet)
                .build()?;
            output::print_build_report(None, &report, color)?;
        }
        Commands::Batch {
            manifest,
            only,
            quiet,
        } => {
            let manifest = Manifest::load(&manifest)
                .with_context(|| format!("Failed to load manifest {}", manifest.display()))?;

            for dataset in manifest.select(only.as_deref())? {
                let report = CorpusBuilder::new(dataset.build.clone())
                    .and_then(|b| b.with_progress(!quiet).build())
                    .with_context(|| format!("Dataset {:?} failed", dataset.name))?;
                output::print_build_report(Some(&dataset.name), &report, color)?;
            }
        }
        Commands::Verify {
            corpus,
            offsets,
            delimiter,
        } => {
            let report = verify_corpus(&corpus, &offsets, delimiter)?;
            output::print_verify_report(&report, color)?;
        }
        Commands::Locate {
            corpus,
            offsets,
            ranks,
            positions,
        } => {
            let table = OffsetTable::load(&offsets)?;
            let corpus_len = std::fs::metadata(&corpus)
                .with_context(|| format!("Failed to stat {}", corpus.display()))?
                .len();
            let ranks = ranks.as_deref().map(load_ranks).transpose()?;
            if let Some(ranks) = &ranks {
                anyhow::ensure!(
                    ranks.len() == table.len(),
                    "ranks file has {} entries but offsets has {}",
                    ranks.len(),
                    table.len()
                );
            }

            let locations: Vec<_> = positions
                .into_iter()
                .map(|pos| {
                    let doc = table.document_at(pos, corpus_len);
                    let rank = doc.and_then(|d| ranks.as_ref().map(|r| r[d]));
                    (pos, doc, rank)
                })
                .collect();
            output::print_locations(&locations, color)?;
        }
    }

    Ok(())
}
