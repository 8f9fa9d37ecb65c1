use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use technique_indexer::CorpusIndex;
use technique_protocol::{Query, RetrievalConfig, TechniqueRecord};
use technique_search::RetrievalEngine;
use technique_semantics::{extract_keywords, ConceptTaxonomy, SemanticProfiler};

mod report;

#[derive(Parser)]
#[command(name = "technique-finder")]
#[command(about = "Coverage-balanced technique retrieval over a knowledge corpus", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for results)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank a corpus snapshot against a query and print the selection
    Retrieve {
        /// Path to a JSON array of technique records
        #[arg(long)]
        corpus: PathBuf,

        /// What the retrieval should support
        #[arg(long)]
        objective: String,

        /// Domain label, e.g. "ai safety"
        #[arg(long, default_value = "")]
        domain: String,

        /// Inline context passage
        #[arg(long, default_value = "", conflicts_with = "context_file")]
        context: String,

        /// Context passage read from a file
        #[arg(long)]
        context_file: Option<PathBuf>,

        /// Retrieval config (TOML); defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured selection size
        #[arg(long)]
        top_k: Option<usize>,

        /// Emit the full selection result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show concept weights and extracted keywords for a text
    Profile {
        /// Inline text
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// Text read from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Build the index for a corpus snapshot and print build statistics
    Stats {
        /// Path to a JSON array of technique records
        #[arg(long)]
        corpus: PathBuf,

        /// Emit statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli.command) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Retrieve {
            corpus,
            objective,
            domain,
            context,
            context_file,
            config,
            top_k,
            json,
        } => {
            let records = load_records(&corpus)?;
            let config = load_config(config.as_deref(), top_k)?;
            let context_text = match context_file {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("reading context file {}", path.display()))?,
                None => context,
            };

            let query = Query {
                objective_text: objective,
                domain_label: domain,
                context_text,
            };

            let engine = RetrievalEngine::new(config)?;
            let result = engine.retrieve_from_records(&records, &query);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", report::render_selection(&result));
            }
            Ok(())
        }

        Commands::Profile { text, file } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => fs::read_to_string(&path)
                    .with_context(|| format!("reading text file {}", path.display()))?,
                (None, None) => anyhow::bail!("pass --text or --file"),
            };

            let profiler = SemanticProfiler::new(ConceptTaxonomy::builtin());
            let profile = profiler.profile(&text);
            let keywords = extract_keywords(&text);
            print!("{}", report::render_profile(&profile, &keywords));
            Ok(())
        }

        Commands::Stats { corpus, json } => {
            let records = load_records(&corpus)?;
            let profiler = SemanticProfiler::new(ConceptTaxonomy::builtin());
            let index = CorpusIndex::build(&records, &profiler);

            if json {
                println!("{}", serde_json::to_string_pretty(index.stats())?);
            } else {
                print!("{}", report::render_stats(index.stats()));
            }
            Ok(())
        }
    }
}

fn load_records(path: &Path) -> Result<Vec<TechniqueRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading corpus {}", path.display()))?;
    let records: Vec<TechniqueRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing corpus {}", path.display()))?;
    log::debug!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn load_config(path: Option<&Path>, top_k: Option<usize>) -> Result<RetrievalConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            RetrievalConfig::from_toml_str(&raw)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => RetrievalConfig::default(),
    };

    if let Some(top_k) = top_k {
        config.top_k = top_k;
        config.validate()?;
    }
    Ok(config)
}
