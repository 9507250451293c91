//! Owns a tenant's storage root and current segment, and exposes the
//! `search`/`fetch`/`describe`/`browse` operations (spec.md §4.5).
//!
//! Residency uses an `ArcSwapOption<SegmentReader>` (the same hot-swap-a-
//! reader pattern a tantivy-backed service uses for its `Searcher`): readers
//! load the current `Arc` with no lock, and publishing a new segment is a
//! single atomic store. The predecessor segment's file handles stay open
//! until every `Arc` clone a concurrent `search`/`fetch` took out has been
//! dropped — ordinary Rust reference counting gives us "close the old one
//! once in-flight queries have completed" for free, no explicit drain step.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use docsearch_schema::Schema;
use docsearch_scorer::Scorer;
use docsearch_segment::SegmentReader;
use tracing::{info, warn};

use crate::browse;
use crate::error::TenantError;
use crate::types::{
    DescribeResponse, DirectoryTree, FetchMode, FetchResponse, SearchHit, SearchResponse,
    SearchStats, SyncDelegate, SyncTriggerResult, TenantConfig, TenantHealth,
};

const MAX_QUERY_CHARS: usize = 1024;
const MAX_SEARCH_SIZE: usize = 100;
const MAX_BROWSE_DEPTH: u32 = 5;

pub struct TenantRuntime {
    config: TenantConfig,
    schema: Schema,
    reader: ArcSwapOption<SegmentReader>,
    sync_delegate: Option<Arc<dyn SyncDelegate>>,
}

impl TenantRuntime {
    pub fn new(config: TenantConfig, schema: Schema) -> Self {
        Self {
            config,
            schema,
            reader: ArcSwapOption::empty(),
            sync_delegate: None,
        }
    }

    pub fn with_sync_delegate(mut self, delegate: Arc<dyn SyncDelegate>) -> Self {
        self.sync_delegate = Some(delegate);
        self
    }

    pub fn codename(&self) -> &str {
        &self.config.codename
    }

    pub fn docs_root_dir(&self) -> &Path {
        &self.config.docs_root_dir
    }

    /// Re-reads the manifest and, if it names a fingerprint different from
    /// the currently resident segment (or none is resident yet), opens the
    /// new segment and atomically swaps it in. Returns whether a swap
    /// occurred.
    pub fn refresh(&self) -> Result<bool, TenantError> {
        let manifest = docsearch_indexer::read_manifest(&self.config.docs_root_dir)?;
        let Some(manifest) = manifest else {
            return Ok(false);
        };

        let current_fingerprint = self
            .reader
            .load()
            .as_ref()
            .map(|r| r.meta().content_fingerprint.clone());
        if current_fingerprint.as_deref() == Some(manifest.fingerprint.as_str()) {
            return Ok(false);
        }

        let path = docsearch_indexer::segment_path(&self.config.docs_root_dir, &manifest.fingerprint);
        let new_reader = SegmentReader::open(&path)?;
        self.reader.store(Some(Arc::new(new_reader)));
        info!(tenant = %self.config.codename, fingerprint = %manifest.fingerprint, "tenant_segment_published");
        Ok(true)
    }

    /// Returns the resident segment, opening it lazily from the manifest on
    /// first use. `<TenantNotReady>` when no segment has ever been
    /// published; `<IndexCorrupt>` when the manifest exists but the segment
    /// file fails to open.
    fn ensure_open(&self) -> Result<Arc<SegmentReader>, TenantError> {
        if let Some(reader) = self.reader.load_full() {
            return Ok(reader);
        }
        self.refresh()?;
        self.reader.load_full().ok_or(TenantError::TenantNotReady)
    }

    pub fn search(
        &self,
        query: &str,
        size: usize,
        word_match: bool,
    ) -> Result<SearchResponse, TenantError> {
        if query.is_empty() {
            return Err(TenantError::InvalidArgument("query must not be empty".into()));
        }
        if query.chars().count() > MAX_QUERY_CHARS {
            return Err(TenantError::InvalidArgument(format!(
                "query exceeds {MAX_QUERY_CHARS} characters"
            )));
        }
        if size > MAX_SEARCH_SIZE {
            return Err(TenantError::InvalidArgument(format!(
                "size exceeds {MAX_SEARCH_SIZE}"
            )));
        }
        if size == 0 {
            return Ok(SearchResponse {
                query: query.to_string(),
                results: Vec::new(),
                stats: None,
            });
        }

        let reader = self.ensure_open()?;
        let mut search_config = self.config.search.clone();
        if word_match {
            search_config.ranking.enable_fuzzy = false;
        }

        let scorer = Scorer::new(&reader, &self.schema, search_config);
        let hits = scorer.search(query, size)?;
        let results: Vec<SearchHit> = hits
            .into_iter()
            .map(|h| SearchHit {
                uri: h.uri,
                title: h.title,
                score: h.score,
                snippet: h.snippet,
            })
            .collect();

        Ok(SearchResponse {
            query: query.to_string(),
            stats: Some(SearchStats {
                total_candidates: reader.collection_stats().doc_count as usize,
                returned: results.len(),
            }),
            results,
        })
    }

    pub fn fetch(
        &self,
        uri: &str,
        mode: FetchMode,
        query_hint: Option<&str>,
    ) -> Result<FetchResponse, TenantError> {
        let reader = self.ensure_open()?;
        let doc_id = reader
            .doc_id_for_key(uri)?
            .ok_or_else(|| TenantError::NotFound(uri.to_string()))?;
        let stored = reader
            .stored_document(doc_id)?
            .ok_or_else(|| TenantError::NotFound(uri.to_string()))?;

        let title = stored
            .fields
            .get("title")
            .and_then(|v| v.first())
            .cloned()
            .unwrap_or_default();
        let body = stored
            .fields
            .get("body")
            .and_then(|v| v.first())
            .cloned()
            .unwrap_or_default();

        let content = match mode {
            FetchMode::Full => body,
            FetchMode::Surrounding => {
                let context_chars = self.config.search.snippet.surrounding_context_chars;
                let center = query_hint
                    .and_then(|q| body.to_lowercase().find(&q.to_lowercase()))
                    .unwrap_or(0);
                docsearch_scorer::surrounding_window(&body, center, context_chars)
            }
        };

        Ok(FetchResponse {
            uri: uri.to_string(),
            title,
            content,
        })
    }

    pub fn describe(&self) -> DescribeResponse {
        DescribeResponse {
            codename: self.config.codename.clone(),
            display_name: self.config.display_name.clone(),
            description: self.config.description.clone(),
            source_kind: self.config.source_kind,
            example_queries: self.config.example_queries.clone(),
            url_prefixes: self.config.url_prefixes.clone(),
        }
    }

    pub fn browse(&self, path: &Path, depth: u32) -> Result<DirectoryTree, TenantError> {
        if !self.config.source_kind.supports_browse() {
            return Err(TenantError::NotSupported(
                "browse is not supported for online tenants".into(),
            ));
        }
        let depth = depth.min(MAX_BROWSE_DEPTH);
        let root = browse::browse(&self.config.docs_root_dir, path, depth)?;
        Ok(DirectoryTree { root })
    }

    pub fn health(&self) -> TenantHealth {
        let reader = self.reader.load();
        TenantHealth {
            codename: self.config.codename.clone(),
            resident: reader.is_some(),
            segment_fingerprint: reader
                .as_ref()
                .map(|r| r.meta().content_fingerprint.clone()),
            sync: self.sync_delegate.as_ref().map(|d| d.stats()),
        }
    }

    pub fn trigger_sync(&self, force_full: bool) -> Option<SyncTriggerResult> {
        let result = self.sync_delegate.as_ref().map(|d| d.trigger(force_full));
        if result.is_none() {
            warn!(tenant = %self.config.codename, "tenant_sync_trigger_without_delegate");
        }
        result
    }
}
