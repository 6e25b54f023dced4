//! The dual-write destination for extracted articles.
//!
//! Every successful extraction goes through one logical write that lands in
//! two physical sinks:
//!
//! - [`json`]: a JSON document on the filesystem, under the run's dated
//!   partition directory
//! - [`store`]: the same document upserted into the persistent store
//!
//! Both writes are keyed by the source plus the same deterministic article
//! key, so re-runs within the same partition overwrite files in place and
//! never create duplicate store documents, and sources that syndicate the
//! same URL never clobber each other.
//!
//! # Output structure
//!
//! ```text
//! output_root/
//! └── 2025-05-06/
//!     ├── bbc/
//!     │   ├── bbc-co-uk-news-world-123.json
//!     │   └── bbc-co-uk-news-world-456.json
//!     ├── npr/
//!     │   └── npr-org-2025-05-06-slug.json
//!     └── error_logs.txt
//! ```

pub mod json;
pub mod store;

use crate::error::WriteError;
use crate::models::Article;
use crate::utils::article_key;
use std::path::PathBuf;
use std::sync::Arc;
use store::DocumentStore;
use tracing::{debug, instrument};

/// The dual-write article sink for one run.
///
/// Holds the partition computed once at run start; every write for the run
/// goes under it, even if the run crosses a date boundary.
pub struct ArticleSink {
    output_root: PathBuf,
    partition: String,
    store: Arc<dyn DocumentStore>,
}

impl ArticleSink {
    pub fn new(
        output_root: impl Into<PathBuf>,
        partition: impl Into<String>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            output_root: output_root.into(),
            partition: partition.into(),
            store,
        }
    }

    /// Write one article to both sinks: the JSON file first, then the store
    /// upsert.
    ///
    /// The two writes are not transactional with each other; whichever
    /// sub-sink fails first surfaces as the corresponding [`WriteError`]
    /// variant, and the caller records it rather than retrying. A file
    /// already written when the store upsert fails stays on disk; a later
    /// re-run overwrites it in place.
    #[instrument(level = "debug", skip_all, fields(source_id, url = %article.url))]
    pub async fn write(&self, source_id: &str, article: &Article) -> Result<(), WriteError> {
        let key = article_key(&article.url);
        let document = serde_json::to_value(article).map_err(|source| WriteError::Serialize {
            url: article.url.clone(),
            source,
        })?;

        let path = json::write_article(&self.output_root, &self.partition, source_id, &key, &document)
            .await?;
        debug!(path = %path.display(), "Wrote article JSON");

        self.store
            .upsert(source_id, &key, &document)
            .await
            .map_err(|source| WriteError::Store {
                key: key.clone(),
                source,
            })?;
        debug!(%key, "Upserted article document");

        Ok(())
    }
}
