//! Utility functions for run timing, output partitioning, and file system checks.
//!
//! This module provides helpers used throughout the pipeline:
//! - The [`Clock`] abstraction the orchestrator reads wall-clock time through
//! - Partition-key derivation (the dated directory segment)
//! - Article-key derivation for output filenames and store upserts
//! - File system validation for the output root

use chrono::{DateTime, Local};
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Wall-clock time source for a run.
///
/// The orchestrator reads the clock exactly once per run and derives the
/// output partition from that single instant, so a run that spans a date
/// boundary still writes everything under the partition it started in.
/// Tests substitute a fixed clock.
pub trait Clock {
    /// The current local instant.
    fn now(&self) -> DateTime<Local>;
}

/// Production [`Clock`] backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Format an instant as a partition key: the `YYYY-MM-DD` directory segment
/// all of one run's output is written under.
pub fn partition_key(instant: DateTime<Local>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// Derive a deterministic, filesystem-safe key for an article from its URL.
///
/// Percent escapes are decoded first, the scheme is dropped, and every
/// remaining character outside `[a-z0-9]` becomes a hyphen, with runs of
/// hyphens collapsed. The same URL always yields the same key, so a re-run
/// within the same partition overwrites the prior file and upserts the same
/// store document.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     article_key("https://example.com/news/some-story.html"),
///     "example-com-news-some-story-html"
/// );
/// ```
pub fn article_key(url: &str) -> String {
    let decoded = urlencoding::decode(url).map_or_else(|_| url.to_string(), |d| d.into_owned());
    let without_scheme = decoded
        .strip_prefix("https://")
        .or_else(|| decoded.strip_prefix("http://"))
        .unwrap_or(&decoded);

    let mut key = String::with_capacity(without_scheme.len());
    let mut last_was_hyphen = true;
    for c in without_scheme.chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            key.push('-');
            last_was_hyphen = true;
        }
    }
    while key.ends_with('-') {
        key.pop();
    }
    key
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_partition_key_format() {
        let instant = Local.with_ymd_and_hms(2025, 5, 6, 23, 59, 59).unwrap();
        assert_eq!(partition_key(instant), "2025-05-06");
    }

    #[test]
    fn test_article_key_strips_scheme_and_sanitizes() {
        assert_eq!(
            article_key("https://example.com/news/some-story.html"),
            "example-com-news-some-story-html"
        );
        assert_eq!(
            article_key("http://example.com/a//b/"),
            "example-com-a-b"
        );
    }

    #[test]
    fn test_article_key_decodes_percent_escapes() {
        // 'ø' is not ascii alphanumeric, so it collapses into the hyphen run
        assert_eq!(article_key("https://example.com/s%C3%B8k?q=1"), "example-com-s-k-q-1");
    }

    #[test]
    fn test_article_key_deterministic() {
        let url = "https://example.com/2025/05/06/slug";
        assert_eq!(article_key(url), article_key(url));
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b/c");
        ensure_writable_dir(nested.to_str().unwrap()).await.unwrap();
        assert!(nested.is_dir());
    }
}
