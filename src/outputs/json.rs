//! Filesystem half of the article sink.
//!
//! Articles are written one JSON document per file, organized by partition
//! date and source:
//!
//! ```text
//! output_root/
//! └── 2025-05-06/
//!     └── bbc/
//!         └── <article_key>.json
//! ```
//!
//! Intermediate directories are created as needed; a repeated key within the
//! same partition overwrites the prior file, so re-runs within the same day
//! converge on one file per article.

use crate::error::WriteError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::instrument;

/// Write one serialized article under `output_root/<partition>/<source_id>/<key>.json`.
///
/// Returns the path written.
#[instrument(level = "debug", skip_all, fields(source_id, key))]
pub async fn write_article(
    output_root: &Path,
    partition: &str,
    source_id: &str,
    key: &str,
    document: &serde_json::Value,
) -> Result<PathBuf, WriteError> {
    let dir = output_root.join(partition).join(source_id);
    fs::create_dir_all(&dir)
        .await
        .map_err(|source| WriteError::Filesystem {
            path: dir.clone(),
            source,
        })?;

    let path = dir.join(format!("{key}.json"));
    let json = document.to_string();
    fs::write(&path, json)
        .await
        .map_err(|source| WriteError::Filesystem {
            path: path.clone(),
            source,
        })?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_article_creates_partition_and_source_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let document = serde_json::json!({ "url": "https://example.com/a", "title": "T" });

        let path = write_article(tmp.path(), "2025-05-06", "bbc", "example-com-a", &document)
            .await
            .unwrap();

        assert_eq!(
            path,
            tmp.path().join("2025-05-06/bbc/example-com-a.json")
        );
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, document);
    }

    #[tokio::test]
    async fn test_write_article_unwritable_root_is_filesystem_error() {
        let document = serde_json::json!({ "url": "https://example.com/a" });

        let err = write_article(
            Path::new("/proc/nonexistent"),
            "2025-05-06",
            "bbc",
            "k",
            &document,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, WriteError::Filesystem { .. }));
    }
}
