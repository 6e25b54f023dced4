//! Error types for the archiving pipeline.
//!
//! Failures fall into three categories with very different handling:
//!
//! - [`SetupError`]: resolution of settings, the store connection, or the
//!   output root failed. These are fatal and abort the whole run.
//! - [`FetchError`]: one article (or one source's article list) could not be
//!   fetched or extracted. Recoverable; the source unit records it and moves
//!   on to the next article.
//! - [`WriteError`]: one of the two sinks could not complete. The filesystem
//!   and database writes are not transactional with each other, so a partial
//!   success surfaces as the variant naming the sub-sink that failed.
//!   Recoverable like a fetch failure.
//!
//! Nothing in the core retries: recoverable errors become exactly one
//! [`ErrorRecord`](crate::models::ErrorRecord) each.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal startup failure. Aborts the run before or during orchestration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("could not read sources file {path}: {source}")]
    SourcesRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse sources file {path}: {source}")]
    SourcesParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A source entry was missing a required field. Raised at load time so
    /// a malformed entry is never discovered mid-run.
    #[error("invalid source entry #{index}: {reason}")]
    InvalidSource { index: usize, reason: String },

    #[error("could not connect to the article store: {0}")]
    StoreConnect(#[source] sqlx::Error),

    #[error("could not run article store migrations: {0}")]
    StoreMigrate(#[source] sqlx::migrate::MigrateError),

    #[error("could not create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Recoverable failure while fetching a feed or extracting one article.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed could not be parsed: {0}")]
    Feed(#[from] rss::Error),

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("no readable content found at {url}")]
    EmptyContent { url: String },
}

/// Recoverable failure in one of the two article sinks.
///
/// The variant identifies which sub-sink failed; the caller converts it
/// into an error record rather than retrying.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("filesystem write failed for {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize article {url}: {source}")]
    Serialize {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store upsert failed for {key}: {source}")]
    Store {
        key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
