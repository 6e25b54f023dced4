//! Loading and validation of the sources file.
//!
//! Sources are configured in a YAML file, one entry per feed:
//!
//! ```yaml
//! - name: bbc
//!   feed_url: https://feeds.bbci.co.uk/news/rss.xml
//! - name: npr
//!   feed_url: https://feeds.npr.org/1001/rss.xml
//! ```
//!
//! The file is read once at startup. Every entry is validated here so a
//! malformed source is a fatal [`SetupError`] before any fetching starts,
//! never a surprise halfway through a run.

use crate::error::SetupError;
use crate::models::Source;
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

/// Load and validate the list of sources from a YAML file.
///
/// # Errors
///
/// Returns a [`SetupError`] if the file cannot be read or parsed, or if any
/// entry has an empty `name` or `feed_url`.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_sources(path: impl AsRef<Path>) -> Result<Vec<Source>, SetupError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| SetupError::SourcesRead {
        path: path.to_path_buf(),
        source,
    })?;

    let sources: Vec<Source> =
        serde_yaml::from_str(&raw).map_err(|source| SetupError::SourcesParse {
            path: path.to_path_buf(),
            source,
        })?;

    validate_sources(&sources)?;

    info!(count = sources.len(), "Loaded sources");
    Ok(sources)
}

fn validate_sources(sources: &[Source]) -> Result<(), SetupError> {
    for (index, source) in sources.iter().enumerate() {
        if source.name.trim().is_empty() {
            return Err(SetupError::InvalidSource {
                index,
                reason: "name must not be empty".to_string(),
            });
        }
        if source.feed_url.trim().is_empty() {
            return Err(SetupError::InvalidSource {
                index,
                reason: format!("source '{}' has an empty feed_url", source.name),
            });
        }
        if let Err(e) = Url::parse(&source.feed_url) {
            return Err(SetupError::InvalidSource {
                index,
                reason: format!("source '{}' has an invalid feed_url: {e}", source.name),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_sources_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_sources_parses_yaml() {
        let file = write_sources_file(
            "- name: bbc\n  feed_url: https://feeds.bbci.co.uk/news/rss.xml\n\
             - name: npr\n  feed_url: https://feeds.npr.org/1001/rss.xml\n",
        );

        let sources = load_sources(file.path()).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, "bbc");
        assert_eq!(sources[1].feed_url, "https://feeds.npr.org/1001/rss.xml");
    }

    #[test]
    fn test_load_sources_rejects_empty_name() {
        let file = write_sources_file("- name: \"\"\n  feed_url: https://example.com/rss\n");

        let err = load_sources(file.path()).unwrap_err();
        assert!(matches!(err, SetupError::InvalidSource { index: 0, .. }));
    }

    #[test]
    fn test_load_sources_rejects_empty_feed_url() {
        let file = write_sources_file("- name: bbc\n  feed_url: \"\"\n");

        let err = load_sources(file.path()).unwrap_err();
        assert!(matches!(err, SetupError::InvalidSource { .. }));
    }

    #[test]
    fn test_load_sources_rejects_unparseable_feed_url() {
        let file = write_sources_file("- name: bbc\n  feed_url: \"not a url\"\n");

        let err = load_sources(file.path()).unwrap_err();
        assert!(matches!(err, SetupError::InvalidSource { .. }));
    }

    #[test]
    fn test_load_sources_missing_file_is_fatal() {
        let err = load_sources("/nonexistent/sources.yaml").unwrap_err();
        assert!(matches!(err, SetupError::SourcesRead { .. }));
    }
}
