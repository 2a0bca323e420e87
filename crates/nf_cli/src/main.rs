use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use nf_core::config::AppConfig;
use nf_core::notify::{LogSink, NotificationSink};
use nf_core::{target_date, Result};
use nf_pipeline::{AgentClient, Pipeline, RemoteAgent, ScriptedAgent};
use nf_scrapers::{default_scrapers, Collector};
use nf_storage::{MemoryStore, NewsStore, SupabaseStore};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Daily tech-news collection and enrichment", long_about = None)]
struct Cli {
    /// Path to a YAML config file. Falls back to ./config.yaml and
    /// NF_-prefixed environment variables.
    #[arg(long)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Collect, enrich and store yesterday's articles.
    Run {
        /// Use an in-memory store and skip the hosted table entirely.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the most recently stored articles.
    Recent {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Show articles captured for a given date (YYYY-MM-DD).
    Date { date: NaiveDate },
    /// Count stored articles.
    Count,
    /// Delete a stored article by row id.
    Delete { id: i64 },
    /// List the configured sources.
    Sources,
}

async fn run(config: &AppConfig, dry_run: bool) -> Result<()> {
    let store: Arc<dyn NewsStore> = if dry_run {
        info!("🧪 dry run, using in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(SupabaseStore::connect(&config.store).await?)
    };

    let agent: Arc<dyn AgentClient> = match RemoteAgent::new(&config.agent) {
        Ok(remote) => Arc::new(remote),
        Err(e) if dry_run => {
            warn!(error = %e, "no agent credentials, dry run continues degraded");
            Arc::new(ScriptedAgent::failing())
        }
        Err(e) => return Err(e),
    };

    let date = target_date();
    let collector = Collector::new(default_scrapers(), config.pipeline.per_source_limit);
    info!(%date, sources = ?collector.source_tags(), "🚀 starting run");

    let articles = collector.fetch_all().await;
    if articles.is_empty() {
        info!("📭 no articles collected, nothing to store");
        return Ok(());
    }

    let pipeline = Pipeline::new(agent, &config.pipeline);
    let processed = pipeline.process(&articles).await;

    let stored = store.insert_batch(&processed).await;
    info!(
        collected = articles.len(),
        processed = processed.len(),
        stored,
        "✨ run finished"
    );

    LogSink.deliver(date, &processed).await
}

fn print_rows(rows: &[nf_storage::StoredArticle]) {
    for row in rows {
        println!(
            "[{}] {} | {} | {}\n    {}\n    {}",
            row.id, row.date, row.tag, row.localized_title, row.summary, row.link
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { dry_run } => run(&config, dry_run).await?,
        Commands::Recent { limit } => {
            let store = SupabaseStore::connect(&config.store).await?;
            print_rows(&store.query_recent(limit).await?);
        }
        Commands::Date { date } => {
            let store = SupabaseStore::connect(&config.store).await?;
            print_rows(&store.query_by_date(date).await?);
        }
        Commands::Count => {
            let store = SupabaseStore::connect(&config.store).await?;
            println!("{}", store.count().await?);
        }
        Commands::Delete { id } => {
            let store = SupabaseStore::connect(&config.store).await?;
            if store.delete_by_id(id).await? {
                println!("deleted {}", id);
            } else {
                println!("no row with id {}", id);
            }
        }
        Commands::Sources => {
            let collector = Collector::new(default_scrapers(), config.pipeline.per_source_limit);
            for tag in collector.source_tags() {
                println!("{}", tag);
            }
        }
    }

    Ok(())
}
