//! Data models for sources, articles, and failure records.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`Source`]: one configured origin of articles (a feed)
//! - [`Article`]: one fetched and extracted piece of content
//! - [`ErrorRecord`]: a logged failure for one article or source fetch
//! - [`RunSummary`]: counts reported by the orchestrator at run end
//!
//! `Source` values are loaded once from the sources file and are read-only
//! afterwards. `Article` values are transient: they exist only between
//! extraction and the sink write.

use serde::{Deserialize, Serialize};

/// One configured news source.
///
/// Sources are loaded from the YAML sources file at startup and validated
/// there; by the time a `Source` reaches the pipeline, `name` and `feed_url`
/// are known to be non-empty.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Source {
    /// Short identifier used for the output subdirectory and the store's
    /// `source` column (e.g. `"bbc"`).
    pub name: String,
    /// URL of the source's RSS/Atom feed.
    pub feed_url: String,
}

/// One extracted article, between extraction and the sink write.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Article {
    /// The URL the article was fetched from.
    pub url: String,
    /// Extracted headline, empty if the page had none.
    pub title: String,
    /// Extracted body text.
    pub content: String,
    /// Name of the [`Source`] this article came from.
    pub source: String,
}

/// A recorded failure for one article, or for a source whose article list
/// could not be fetched at all.
///
/// Records are never mutated after creation. Append order in the run's
/// error log reflects processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// The article URL, or the feed URL for a list-fetch failure.
    pub url: String,
    /// Name of the source the failure belongs to.
    pub source: String,
    /// Human-readable description of what went wrong.
    pub error_message: String,
}

impl ErrorRecord {
    /// Render this record as one pipe-delimited error-log line
    /// (`url|source|error_message`), without a trailing newline.
    ///
    /// Line breaks and pipes inside the message would split or shift the
    /// delimited fields, so they are flattened to spaces and slashes here.
    pub fn to_line(&self) -> String {
        let message = self
            .error_message
            .replace(['\r', '\n'], " ")
            .replace('|', "/");
        format!("{}|{}|{}", self.url, self.source, message)
    }
}

/// Counts reported by [`NewsRun::run`](crate::pipeline::NewsRun::run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of articles written to both sinks.
    pub articles_written: usize,
    /// Number of error records accumulated over the run.
    pub errors: usize,
    /// The dated partition (`YYYY-MM-DD`) all output was written under.
    pub partition: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_record_line_format() {
        let record = ErrorRecord {
            url: "http://a".to_string(),
            source: "X".to_string(),
            error_message: "timeout".to_string(),
        };

        assert_eq!(record.to_line(), "http://a|X|timeout");
    }

    #[test]
    fn test_error_record_line_flattens_delimiters_in_message() {
        let record = ErrorRecord {
            url: "http://a".to_string(),
            source: "X".to_string(),
            error_message: "left | right\nsecond line".to_string(),
        };

        let line = record.to_line();
        assert_eq!(line, "http://a|X|left / right second line");
        // Still exactly one line with exactly three fields.
        assert_eq!(line.matches('|').count(), 2);
        assert!(!line.contains('\n'));
    }
}
