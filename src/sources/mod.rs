//! Fetching article lists and extracting article content.
//!
//! Every configured source follows the same two-phase pattern:
//!
//! 1. **Listing**: fetch the source's RSS/Atom feed and collect the linked
//!    article URLs, in feed order
//! 2. **Extraction**: download each article page and pull out its headline
//!    and paragraph text
//!
//! The pipeline depends only on the [`ArticleFetcher`] trait; the production
//! implementation is [`feed::FeedFetcher`]. Failed listings and extractions
//! are returned as errors for the source unit to record; nothing here
//! retries or skips silently.

pub mod feed;

use crate::error::FetchError;
use crate::models::{Article, Source};
use async_trait::async_trait;

/// Fetch capability a source unit drives.
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    /// Fetch the source's article list, in the natural order the feed
    /// returns it. No reordering, no deduplication.
    async fn list_articles(&self, source: &Source) -> Result<Vec<String>, FetchError>;

    /// Download and extract one article.
    async fn extract_article(&self, source: &Source, url: &str) -> Result<Article, FetchError>;
}
