//! Run-scoped accumulation of failure records.
//!
//! Every per-article or per-source failure in a run ends up here as one
//! [`ErrorRecord`], in processing order. The log lives in memory for the
//! whole run and is flushed exactly once at run end, into the same dated
//! partition the articles were written to:
//!
//! ```text
//! output_root/
//! └── 2025-05-06/
//!     ├── bbc/
//!     │   └── <article_key>.json
//!     └── error_logs.txt
//! ```
//!
//! Each line of `error_logs.txt` is pipe-delimited: `url|source|error_message`.
//! An empty file is valid output for a clean run.

use crate::models::ErrorRecord;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// File name of the rendered error log inside the partition directory.
pub const ERROR_LOG_FILE: &str = "error_logs.txt";

/// Append-only, in-memory collection of the run's failure records.
#[derive(Debug, Default)]
pub struct ErrorLog {
    records: Vec<ErrorRecord>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record. Records are never mutated or reordered afterwards.
    pub fn append(&mut self, record: ErrorRecord) {
        self.records.push(record);
    }

    /// Number of records accumulated so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Render every accumulated record as one pipe-delimited line and write
    /// the result to `path`, overwriting any previous file.
    ///
    /// Called exactly once, at run end, regardless of how many records were
    /// accumulated; zero records still produce the (empty) file.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn flush(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let mut rendered = String::new();
        for record in &self.records {
            rendered.push_str(&record.to_line());
            rendered.push('\n');
        }

        fs::write(path.as_ref(), rendered).await?;
        info!(records = self.records.len(), "Wrote error log");
        Ok(())
    }
}
