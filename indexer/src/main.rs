use anyhow::Result;
use clap::{Parser, Subcommand};
use search_core::persist::{save_docs, save_index, save_meta, IndexPaths, MetaFile};
use search_core::tokenizer::normalize;
use search_core::{DocId, DocStore, IndexArtifacts, QueryOptions};
use tracing_subscriber::{fmt, EnvFilter};

use std::path::Path;

mod ingest;
mod shell;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query the TF-IDF book plot index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from input JSON/JSONL/TSV files or a directory
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
    },
    /// Interactive prompt: AND search, ranked search, then field refinement
    Query {
        /// Index directory path
        #[arg(long, default_value = "./index")]
        index: String,
        /// Number of ranked results to print
        #[arg(long, default_value_t = search_core::config::DEFAULT_RANKED_K)]
        k: usize,
        /// Collapse repeated query terms before searching
        #[arg(long, default_value_t = false)]
        dedup_query_terms: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output } => build_index(&input, &output),
        Commands::Query { index, k, dedup_query_terms } => {
            shell::run(&index, k, QueryOptions { dedup_terms: dedup_query_terms })
        }
    }
}

fn build_index(input: &str, output: &str) -> Result<()> {
    let out_paths = IndexPaths::new(output);
    let records = ingest::read_corpus(Path::new(input))?;
    tracing::info!(num_docs = records.len(), "ingested documents");

    let mut docs = DocStore::new();
    let mut tokenized = Vec::with_capacity(records.len());
    for (i, record) in records.into_iter().enumerate() {
        let doc_id = i as DocId;
        tokenized.push((doc_id, normalize(&record.plot)));
        docs.insert(doc_id, record);
    }
    let artifacts = IndexArtifacts::build(tokenized)?;

    save_index(&out_paths, &artifacts)?;
    save_docs(&out_paths, &docs)?;
    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default();
    save_meta(&out_paths, &MetaFile::new(&artifacts, created_at))?;

    tracing::info!(output, num_terms = artifacts.vocabulary.len(), "index build complete");
    Ok(())
}
