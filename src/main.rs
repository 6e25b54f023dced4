//! # News Archiver
//!
//! A batch pipeline that ingests articles from a configured list of news
//! feeds, extracts their text content, and archives every article to both a
//! dated filesystem hierarchy and PostgreSQL. Per-article failures are
//! isolated and aggregated into a run-scoped error log, so one bad article
//! never aborts the run.
//!
//! ## Usage
//!
//! ```sh
//! news_archiver -o ./archive -s ./sources.yaml
//! ```
//!
//! ## Architecture
//!
//! Each invocation is one run:
//! 1. **Setup**: parse arguments, load the sources file, connect to the
//!    article store; any failure here is fatal
//! 2. **Fan-out**: one source unit per configured feed lists, extracts, and
//!    writes its articles, recording failures as it goes
//! 3. **Aggregate**: the accumulated error records are flushed as
//!    `error_logs.txt` into the same dated partition the articles went to
//!
//! ## Output structure
//!
//! ```text
//! output_root/
//! └── 2025-05-06/
//!     ├── bbc/
//!     │   └── <article_key>.json
//!     ├── npr/
//!     │   └── <article_key>.json
//!     └── error_logs.txt
//! ```

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod error_log;
mod models;
mod outputs;
mod pipeline;
mod sources;
mod utils;

use cli::Cli;
use config::load_sources;
use outputs::store::PgDocumentStore;
use pipeline::NewsRun;
use sources::feed::FeedFetcher;
use utils::{SystemClock, ensure_writable_dir};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    // Read .env into the process environment before clap resolves env args
    let _ = dotenvy::dotenv();

    let start_time = std::time::Instant::now();
    info!(start = %Local::now(), "news_archiver starting up");

    let args = Cli::parse();
    debug!(?args.output_root, ?args.sources, "Parsed CLI arguments");

    match run(&args).await {
        Ok(summary) => {
            let elapsed = start_time.elapsed();
            info!(
                partition = %summary.partition,
                articles_written = summary.articles_written,
                errors = summary.errors,
                end = %Local::now(),
                elapsed_secs = elapsed.as_secs(),
                "Archiving completed"
            );
            Ok(())
        }
        Err(e) => {
            // Fatal: nothing was isolated. Log with context, still report
            // elapsed time, and exit non-zero.
            let elapsed = start_time.elapsed();
            error!(
                error = %e,
                end = %Local::now(),
                elapsed_secs = elapsed.as_secs(),
                "Run aborted"
            );
            Err(e)
        }
    }
}

/// Setup phase plus the orchestrated run. Every error escaping this
/// function is fatal for the whole invocation.
async fn run(args: &Cli) -> Result<models::RunSummary, Box<dyn Error>> {
    let source_list = load_sources(&args.sources)?;
    info!(sources = source_list.len(), "Started archiving from all sources");

    // Early check: the output root must exist and be writable.
    ensure_writable_dir(&args.output_root).await?;

    let store = Arc::new(PgDocumentStore::connect(&args.database_url).await?);
    let fetcher = Arc::new(FeedFetcher::new());

    let mut news_run = NewsRun::new(
        source_list,
        args.output_root.as_str(),
        fetcher,
        store,
        SystemClock,
    );
    let summary = news_run.run().await?;
    Ok(summary)
}
