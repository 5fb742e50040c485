// src/main.rs
// =============================================================================
// This is the entry point of the wordcrawl CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load settings (file + flag overrides) and set up logging
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 2 = error)
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod index;
mod server;
mod text;
mod web;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Settings;
use crawl::{CrawlReport, Crawler};
use index::{IndexWriter, SearchHit, SearchRanker, SqliteStore, StoreHandle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use web::HttpTransport;

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG overrides the default of info-level logs for this crate only
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wordcrawl=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let mut settings = Settings::load_or_default(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        settings.database.path = db;
    }

    match cli.command {
        Commands::Crawl {
            seed_url,
            max_depth,
            workers,
            json,
        } => {
            if let Some(seed_url) = seed_url {
                settings.crawl.seed_url = Some(seed_url);
            }
            if let Some(max_depth) = max_depth {
                settings.crawl.max_depth = max_depth;
            }
            if let Some(workers) = workers {
                settings.crawl.workers = workers;
            }
            handle_crawl(&settings, json).await
        }
        Commands::Index => handle_index(&settings).await,
        Commands::Search { query, json } => handle_search(&settings, &query, json).await,
        Commands::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            handle_serve(&settings).await
        }
    }
}

fn open_store(settings: &Settings) -> Result<StoreHandle> {
    let path = &settings.database.path;
    let store = SqliteStore::open(path)
        .with_context(|| format!("cannot open index database {}", path.display()))?;
    Ok(Arc::new(Mutex::new(store)))
}

async fn handle_crawl(settings: &Settings, json: bool) -> Result<i32> {
    settings.validate()?;
    let seed_url = settings.seed_url()?;

    let transport = HttpTransport::new(
        Duration::from_secs(settings.crawl.timeout_seconds),
        &settings.crawl.user_agent,
    )?;
    let store = open_store(settings)?;
    let crawler = Crawler::new(Arc::new(transport), IndexWriter::new(store.clone()));

    if !json {
        println!("🔍 Crawling: {}", seed_url);
        println!(
            "📊 Max depth: {}, workers: {}",
            settings.crawl.max_depth, settings.crawl.workers
        );
    }

    let report = crawler
        .start(seed_url, settings.crawl.max_depth, settings.crawl.workers)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let documents = index::lock(&store)?.document_count()?;
        print_crawl_report(&report, documents);
    }
    Ok(0)
}

fn print_crawl_report(report: &CrawlReport, documents: usize) {
    println!();
    println!("📊 Summary:");
    println!("   📄 Pages indexed: {}", report.pages_indexed);
    println!("   ❌ Failed: {}", report.tasks_failed + report.index_failures);
    println!("   🔗 Links queued: {}", report.links_enqueued);
    println!("   ⏱️  Took: {:.1}s", report.elapsed_secs);
    println!("   🗂️  Documents in index: {}", documents);
}

async fn handle_index(settings: &Settings) -> Result<i32> {
    let writer = IndexWriter::new(open_store(settings)?);
    let count = tokio::task::spawn_blocking(move || writer.reindex_all()).await??;
    println!("✅ Re-indexed {} document(s)", count);
    Ok(0)
}

async fn handle_search(settings: &Settings, query: &str, json: bool) -> Result<i32> {
    let ranker = SearchRanker::new(open_store(settings)?);
    let owned_query = query.to_string();
    let hits = tokio::task::spawn_blocking(move || ranker.search(&owned_query)).await??;

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
    } else {
        print_hits(query, &hits);
    }
    Ok(0)
}

// Prints results as a human-readable table in the terminal
fn print_hits(query: &str, hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No results for \"{}\"", query);
        return;
    }

    println!("{:<4} {:<70} {:>9}", "#", "URL", "RELEVANCE");
    println!("{}", "=".repeat(85));
    for (rank, hit) in hits.iter().enumerate() {
        // Truncate URL if too long for display
        let url_display = if hit.url.chars().count() > 67 {
            format!("{}...", hit.url.chars().take(67).collect::<String>())
        } else {
            hit.url.clone()
        };
        println!("{:<4} {:<70} {:>9}", rank + 1, url_display, hit.relevance);
    }
}

async fn handle_serve(settings: &Settings) -> Result<i32> {
    let addr = settings.socket_addr().await?;
    let ranker = SearchRanker::new(open_store(settings)?);
    server::serve(addr, ranker).await?;
    Ok(0)
}
