//! The run orchestrator and per-source processing units.
//!
//! One invocation of the binary is one run. [`NewsRun`] owns the source
//! list, the fetcher, the store handle, and the run's [`ErrorLog`]; it
//! derives the output partition from a single clock read, drives one
//! [`SourceUnit`] per source to completion, and flushes the error log into
//! the partition directory at the end.
//!
//! # Failure isolation
//!
//! Everything that can go wrong for one article (fetch, extraction, either
//! sink write) is caught at the source unit and becomes exactly one
//! [`ErrorRecord`]; the unit moves on to the next article. A source whose
//! feed cannot be listed at all contributes one record and zero articles.
//! Nothing a unit does can fail the run. Only setup failures (partition
//! directory creation, the final log flush) escape to the caller.
//!
//! Sources are processed one at a time, and articles within a source one at
//! a time, in feed order. Throughput is deliberately traded for simple,
//! strict error isolation and a stable record order.

use crate::error_log::{ERROR_LOG_FILE, ErrorLog};
use crate::models::{ErrorRecord, RunSummary, Source};
use crate::outputs::ArticleSink;
use crate::outputs::store::DocumentStore;
use crate::sources::ArticleFetcher;
use crate::utils::{Clock, partition_key};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{error, info, instrument, warn};

/// Processes one source: list its articles, extract each, hand successes to
/// the sink, and record every failure in the shared error log.
pub struct SourceUnit<'a> {
    source: &'a Source,
    fetcher: &'a dyn ArticleFetcher,
    sink: &'a ArticleSink,
}

impl<'a> SourceUnit<'a> {
    pub fn new(source: &'a Source, fetcher: &'a dyn ArticleFetcher, sink: &'a ArticleSink) -> Self {
        Self {
            source,
            fetcher,
            sink,
        }
    }

    /// Process every article of this source, appending one record per
    /// failure. Returns `(articles_written, articles_listed)`.
    ///
    /// This never fails: a feed that cannot be listed yields one record and
    /// zero articles, and a failed article never stops the ones after it.
    #[instrument(level = "info", skip_all, fields(source = %self.source.name))]
    pub async fn build(&self, errors: &mut ErrorLog) -> (usize, usize) {
        let urls = match self.fetcher.list_articles(self.source).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!(error = %e, feed = %self.source.feed_url, "Could not list articles");
                errors.append(ErrorRecord {
                    url: self.source.feed_url.clone(),
                    source: self.source.name.clone(),
                    error_message: e.to_string(),
                });
                return (0, 0);
            }
        };

        let listed = urls.len();
        let mut written = 0;
        for url in urls {
            match self.fetcher.extract_article(self.source, &url).await {
                Ok(article) => match self.sink.write(&self.source.name, &article).await {
                    Ok(()) => written += 1,
                    Err(e) => {
                        warn!(error = %e, %url, "Write failed; continuing with next article");
                        errors.append(ErrorRecord {
                            url,
                            source: self.source.name.clone(),
                            error_message: e.to_string(),
                        });
                    }
                },
                Err(e) => {
                    warn!(error = %e, %url, "Extraction failed; continuing with next article");
                    errors.append(ErrorRecord {
                        url,
                        source: self.source.name.clone(),
                        error_message: e.to_string(),
                    });
                }
            }
        }

        info!(written, listed, "Source complete");
        (written, listed)
    }
}

/// One batch run over all configured sources.
pub struct NewsRun<C: Clock> {
    sources: Vec<Source>,
    output_root: PathBuf,
    fetcher: Arc<dyn ArticleFetcher>,
    store: Arc<dyn DocumentStore>,
    clock: C,
    errors: ErrorLog,
}

impl<C: Clock> NewsRun<C> {
    pub fn new(
        sources: Vec<Source>,
        output_root: impl Into<PathBuf>,
        fetcher: Arc<dyn ArticleFetcher>,
        store: Arc<dyn DocumentStore>,
        clock: C,
    ) -> Self {
        Self {
            sources,
            output_root: output_root.into(),
            fetcher,
            store,
            clock,
            errors: ErrorLog::new(),
        }
    }

    /// Drive every source to completion and flush the error log.
    ///
    /// The partition is derived from one clock read before any source is
    /// touched; a run that crosses midnight still writes everything under
    /// the date it started on. The partition directory is created up front
    /// so an unusable output root aborts the run before any fetching.
    ///
    /// # Errors
    ///
    /// Only setup-grade failures: the partition directory cannot be created
    /// or the final error log cannot be written.
    #[instrument(level = "info", skip_all, fields(sources = self.sources.len()))]
    pub async fn run(&mut self) -> Result<RunSummary, crate::error::SetupError> {
        // Single clock read for the whole run.
        let partition = partition_key(self.clock.now());
        let partition_dir = self.output_root.join(&partition);
        fs::create_dir_all(&partition_dir).await.map_err(|source| {
            crate::error::SetupError::OutputDir {
                path: partition_dir.clone(),
                source,
            }
        })?;
        info!(%partition, "Resolved output partition");

        let sink = ArticleSink::new(&self.output_root, partition.clone(), self.store.clone());

        let mut written = 0;
        for source in &self.sources {
            let unit = SourceUnit::new(source, self.fetcher.as_ref(), &sink);
            let (unit_written, _) = unit.build(&mut self.errors).await;
            written += unit_written;
        }

        let log_path = partition_dir.join(ERROR_LOG_FILE);
        if let Err(source) = self.errors.flush(&log_path).await {
            error!(path = %log_path.display(), error = %source, "Could not write error log");
            return Err(crate::error::SetupError::OutputDir {
                path: log_path,
                source,
            });
        }

        Ok(RunSummary {
            articles_written: written,
            errors: self.errors.len(),
            partition,
        })
    }
}
