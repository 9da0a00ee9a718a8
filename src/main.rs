use std::io::{stdin, stdout, BufReader};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sqlx::migrate::MigrateDatabase;

use cookdex::config::Config;
use cookdex::jobs;
use cookdex_cookability::Assessor;
use cookdex_lexicon::Classifier;

/// cookdex - deterministic food and ingredient entity resolution
#[derive(Parser)]
#[command(name = "cookdex")]
#[command(about = "Canonical naming, synonym clustering and ingredient resolution", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the database schema
    Migrate,
    /// Build synonym clusters from a JSONL recipe corpus
    ClusterBuild {
        /// Corpus path (overrides config file)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Minimum phrase frequency (overrides config file)
        #[arg(long)]
        min_freq: Option<u64>,

        /// Output artifact path (overrides config file)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Clean an ontology file (dry run unless --write)
    OntologyClean {
        /// Ontology path (overrides config file)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Persist the cleaned ontology back to the file
        #[arg(long)]
        write: bool,
    },
    /// Recompute and store derived data for every food
    #[command(subcommand)]
    Backfill(BackfillTarget),
    /// Resolve ingredient strings (one per line) from a file or stdin
    Resolve {
        /// Input file; reads stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Export the ingredient catalog as JSON
    Export {
        /// Output path (overrides config file)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum BackfillTarget {
    /// Canonical base/specific names
    Canonical {
        /// Skip foods whose stored hash and version are current
        #[arg(long)]
        changed_only: bool,
    },
    /// Cookability assessments
    Cookability {
        /// Skip foods already assessed at the current version
        #[arg(long)]
        changed_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    cookdex::observability::init_observability(
        "cookdex",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Migrate => migrate_command(config).await,
        Commands::ClusterBuild {
            corpus,
            min_freq,
            out,
        } => cluster_build_command(config, corpus, min_freq, out),
        Commands::OntologyClean { path, write } => ontology_clean_command(config, path, write),
        Commands::Backfill(target) => backfill_command(config, target).await,
        Commands::Resolve { input } => resolve_command(config, input).await,
        Commands::Export { out } => export_command(config, out).await,
    }
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: Config) -> Result<()> {
    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!("Database does not exist, creating: {}", config.database.url);
        sqlx::Sqlite::create_database(&config.database.url).await?;
    }

    let pool = cookdex_db::create_pool(&config.database.url, 1).await?;
    cookdex_db::migrate(&pool).await?;

    tracing::info!("Migrations completed successfully");
    Ok(())
}

#[tracing::instrument(skip(config))]
fn cluster_build_command(
    config: Config,
    corpus: Option<PathBuf>,
    min_freq: Option<u64>,
    out: Option<PathBuf>,
) -> Result<()> {
    let corpus = corpus.unwrap_or_else(|| PathBuf::from(&config.artifacts.corpus_path));
    let out = out.unwrap_or_else(|| PathBuf::from(&config.artifacts.clusters_path));

    let mut cluster_config = config.clusters;
    if let Some(min_freq) = min_freq {
        cluster_config.min_frequency = min_freq;
    }

    jobs::build_clusters(&corpus, &out, &cluster_config)?;
    Ok(())
}

#[tracing::instrument(skip(config))]
fn ontology_clean_command(config: Config, path: Option<PathBuf>, write: bool) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(&config.artifacts.ontology_path));
    jobs::clean_ontology(&path, write)?;
    Ok(())
}

#[tracing::instrument(skip(config))]
async fn backfill_command(config: Config, target: BackfillTarget) -> Result<()> {
    let pool = cookdex_db::create_pool(&config.database.url, config.database.max_connections).await?;

    match target {
        BackfillTarget::Canonical { changed_only } => {
            jobs::backfill_canonical(&pool, config.backfill.concurrency, changed_only).await?;
        }
        BackfillTarget::Cookability { changed_only } => {
            let assessor = Assessor::new(config.cookability.threshold);
            jobs::backfill_cookability(&pool, &assessor, config.backfill.concurrency, changed_only)
                .await?;
        }
    }
    Ok(())
}

#[tracing::instrument(skip(config))]
async fn resolve_command(config: Config, input: Option<PathBuf>) -> Result<()> {
    let pool = cookdex_db::create_pool(&config.database.url, config.database.max_connections).await?;

    let classifier = Classifier::default();
    let index = jobs::build_index(&pool, &config.artifacts, &classifier).await?;

    match input {
        Some(path) => {
            let reader = BufReader::new(std::fs::File::open(&path)?);
            jobs::resolve_lines(&index, &classifier, reader, stdout().lock())?;
        }
        None => {
            jobs::resolve_lines(&index, &classifier, stdin().lock(), stdout().lock())?;
        }
    }
    Ok(())
}

#[tracing::instrument(skip(config))]
async fn export_command(config: Config, out: Option<PathBuf>) -> Result<()> {
    let pool = cookdex_db::create_pool(&config.database.url, config.database.max_connections).await?;
    let out = out.unwrap_or_else(|| PathBuf::from(&config.artifacts.catalog_path));
    jobs::write_catalog(&pool, &out).await?;
    Ok(())
}
