//! What a sync actually does before the scheduler publishes a segment:
//! for a `filesystem` tenant, nothing (documents are already on disk);
//! for a `git`/`online` tenant, drive the crawler core against an
//! injected [`Fetcher`] and materialize the results as documents. Either
//! way, publishing is always the scheduler's job (spec.md §4.8): "the
//! indexer is called as a library from the scheduler."

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use docsearch_crawler::{run_crawl, CrawlConfig, Fetcher};
use tracing::info;

use crate::error::SchedulerError;

pub trait SyncExecutor: Send + Sync {
    /// Performs whatever work is needed to make `docs_root` reflect the
    /// latest upstream state, then returns the document count observed.
    fn execute(&self, docs_root: &Path, force_full: bool, cancel: &Arc<AtomicBool>) -> Result<u64, SchedulerError>;
}

/// The `filesystem` source kind needs nothing beyond `docs_root_dir`
/// (spec.md §6): the scheduler's job here is purely to count and publish.
pub struct FilesystemSyncExecutor;

impl SyncExecutor for FilesystemSyncExecutor {
    fn execute(&self, docs_root: &Path, _force_full: bool, _cancel: &Arc<AtomicBool>) -> Result<u64, SchedulerError> {
        let paths = docsearch_indexer::discover_document_paths(docs_root)?;
        Ok(paths.len() as u64)
    }
}

/// Drives the crawler core against a list of seed URLs, writing each
/// fetched document to `<key>.md` under `docs_root`. The `Fetcher` itself
/// (actually speaking HTTP) is the external collaborator (spec.md §6).
pub struct CrawlerSyncExecutor<F: Fetcher + 'static> {
    pub seed_urls: Vec<String>,
    pub fetcher: Arc<F>,
    pub crawl_config: CrawlConfig,
}

impl<F: Fetcher + 'static> SyncExecutor for CrawlerSyncExecutor<F> {
    fn execute(&self, docs_root: &Path, _force_full: bool, cancel: &Arc<AtomicBool>) -> Result<u64, SchedulerError> {
        let report = run_crawl(
            self.seed_urls.clone(),
            self.fetcher.clone() as Arc<dyn Fetcher>,
            &self.crawl_config,
            Arc::clone(cancel),
        );
        for doc in &report.fetched {
            let path = docs_root.join(format!("{}.md", doc.key));
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| SchedulerError::io(parent, e))?;
            }
            let contents = format!("# {}\n\n{}\n", doc.title, doc.body);
            std::fs::write(&path, contents).map_err(|e| SchedulerError::io(&path, e))?;
        }
        info!(
            fetched = report.fetched.len(),
            failed = report.failed,
            throttle_events = report.throttle_events,
            "crawler_sync_executor_complete"
        );
        Ok(report.fetched.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filesystem_executor_counts_existing_documents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "# A\n\nhello\n").unwrap();
        std::fs::write(dir.path().join("b.md"), "# B\n\nworld\n").unwrap();
        let executor = FilesystemSyncExecutor;
        let count = executor
            .execute(dir.path(), false, &Arc::new(AtomicBool::new(false)))
            .unwrap();
        assert_eq!(count, 2);
    }
}
