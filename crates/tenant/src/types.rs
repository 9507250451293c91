use std::path::PathBuf;

use docsearch_scorer::SearchConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Online,
    Git,
    Filesystem,
}

impl SourceKind {
    /// `browse` (spec.md §4.5) is only meaningful for sources backed by a
    /// real directory tree; an online/crawled tenant has no local paths.
    pub fn supports_browse(self) -> bool {
        matches!(self, SourceKind::Git | SourceKind::Filesystem)
    }
}

/// Static configuration for one tenant, loaded from the declarative
/// configuration file (spec.md §6's `tenants[]` entries).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    pub codename: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub source_kind: SourceKind,
    pub docs_root_dir: PathBuf,
    #[serde(default)]
    pub example_queries: Vec<String>,
    #[serde(default)]
    pub url_prefixes: Vec<String>,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    Full,
    Surrounding,
}

impl Default for FetchMode {
    fn default() -> Self {
        FetchMode::Full
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub uri: String,
    pub title: String,
    pub score: f32,
    pub snippet: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchStats {
    pub total_candidates: usize,
    pub returned: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub stats: Option<SearchStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchResponse {
    pub uri: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DescribeResponse {
    pub codename: String,
    pub display_name: String,
    pub description: String,
    pub source_kind: SourceKind,
    pub example_queries: Vec<String>,
    pub url_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_dir: bool,
    pub children: Vec<DirectoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectoryTree {
    pub root: DirectoryEntry,
}

/// Residency + last-sync state surfaced to the dispatcher's health endpoint
/// (spec.md §4.5). `sync` is `None` until the scheduler has recorded at
/// least one trigger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TenantHealth {
    pub codename: String,
    pub resident: bool,
    pub segment_fingerprint: Option<String>,
    pub sync: Option<SyncState>,
}

/// Mirrors the `__scheduler_meta/sync.json` schema (SPEC_FULL.md §A2) that
/// `docsearch-scheduler` persists after every `trigger()`. Read-only here —
/// the tenant runtime reports it, the scheduler owns writing it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncState {
    pub last_sync_at: Option<String>,
    pub last_success_at: Option<String>,
    pub last_error: Option<String>,
    pub documents_count: u64,
    pub consecutive_failures: u32,
    pub lock_status: String,
}

/// The tenant runtime's minimal view onto the sync scheduler protocol
/// (spec.md §4.8/C8): trigger a sync and report its status. Defined here
/// (the consumer) rather than in `docsearch-scheduler` (the implementer) so
/// `docsearch-tenant` never depends on the crawler/git sync machinery it
/// doesn't need — `docsearch-scheduler`'s concrete runtimes implement this
/// trait instead of the tenant crate depending downward on them.
pub trait SyncDelegate: Send + Sync {
    fn trigger(&self, force_full: bool) -> SyncTriggerResult;
    fn stats(&self) -> SyncState;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncTriggerStatus {
    Started,
    AlreadyRunning,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncTriggerResult {
    pub status: SyncTriggerStatus,
    pub lock_status: String,
}
