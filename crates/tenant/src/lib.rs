//! Per-tenant runtime (C6): owns a tenant's storage root and segment
//! residency, exposes `search`/`fetch`/`describe`/`browse`, and delegates
//! sync to whatever implements [`SyncDelegate`] (a `docsearch-scheduler`
//! runtime, in the full service).

mod browse;
mod error;
mod runtime;
mod types;

pub use error::TenantError;
pub use runtime::TenantRuntime;
pub use types::{
    DescribeResponse, DirectoryEntry, DirectoryTree, FetchMode, FetchResponse, SearchHit,
    SearchResponse, SearchStats, SourceKind, SyncDelegate, SyncState, SyncTriggerResult,
    SyncTriggerStatus, TenantConfig, TenantHealth,
};

#[cfg(test)]
mod tests {
    use super::*;
    use docsearch_schema::Schema;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn config(dir: &std::path::Path, source_kind: SourceKind) -> TenantConfig {
        TenantConfig {
            codename: "acme".into(),
            display_name: "Acme Docs".into(),
            description: "Acme's documentation".into(),
            source_kind,
            docs_root_dir: dir.to_path_buf(),
            example_queries: vec!["getting started".into()],
            url_prefixes: vec![],
            search: docsearch_scorer::SearchConfig::default(),
        }
    }

    #[test]
    fn search_before_any_publish_is_tenant_not_ready() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = TenantRuntime::new(
            config(dir.path(), SourceKind::Filesystem),
            Schema::documentation_default(),
        );
        let err = runtime.search("hello", 10, false).unwrap_err();
        assert!(matches!(err, TenantError::TenantNotReady));
    }

    #[test]
    fn empty_query_is_invalid_argument() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = TenantRuntime::new(
            config(dir.path(), SourceKind::Filesystem),
            Schema::documentation_default(),
        );
        let err = runtime.search("", 10, false).unwrap_err();
        assert!(matches!(err, TenantError::InvalidArgument(_)));
    }

    #[test]
    fn size_zero_returns_empty_results_without_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "# Hello\n\nhello world\n").unwrap();
        let schema = Schema::documentation_default();
        docsearch_indexer::build_segment(dir.path(), &schema).unwrap();

        let runtime = TenantRuntime::new(config(dir.path(), SourceKind::Filesystem), schema);
        let resp = runtime.search("hello", 0, false).unwrap();
        assert!(resp.results.is_empty());
    }

    #[test]
    fn publish_then_search_and_fetch_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("intro.md"),
            "# Introduction\n\nWelcome to the docs.\n",
        )
        .unwrap();
        let schema = Schema::documentation_default();
        docsearch_indexer::build_segment(dir.path(), &schema).unwrap();

        let runtime = TenantRuntime::new(config(dir.path(), SourceKind::Filesystem), schema);
        let resp = runtime.search("introduction", 10, false).unwrap();
        assert_eq!(resp.results.len(), 1);
        assert_eq!(resp.results[0].uri, "intro.md");

        let fetch = runtime
            .fetch("intro.md", FetchMode::Full, None)
            .unwrap();
        assert!(fetch.content.contains("Welcome"));

        let missing = runtime.fetch("nope.md", FetchMode::Full, None).unwrap_err();
        assert!(matches!(missing, TenantError::NotFound(_)));
    }

    #[test]
    fn browse_is_not_supported_for_online_tenants() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = TenantRuntime::new(
            config(dir.path(), SourceKind::Online),
            Schema::documentation_default(),
        );
        let err = runtime.browse(&PathBuf::from(""), 2).unwrap_err();
        assert!(matches!(err, TenantError::NotSupported(_)));
    }

    struct StubDelegate;
    impl SyncDelegate for StubDelegate {
        fn trigger(&self, _force_full: bool) -> SyncTriggerResult {
            SyncTriggerResult {
                status: SyncTriggerStatus::Started,
                lock_status: "free".into(),
            }
        }
        fn stats(&self) -> SyncState {
            SyncState {
                last_sync_at: None,
                last_success_at: None,
                last_error: None,
                documents_count: 0,
                consecutive_failures: 0,
                lock_status: "free".into(),
            }
        }
    }

    #[test]
    fn health_reports_sync_delegate_stats() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = TenantRuntime::new(
            config(dir.path(), SourceKind::Filesystem),
            Schema::documentation_default(),
        )
        .with_sync_delegate(Arc::new(StubDelegate));

        let health = runtime.health();
        assert!(!health.resident);
        assert!(health.sync.is_some());
    }
}
