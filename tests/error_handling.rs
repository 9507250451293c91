//! Error-path behavior of the tenant and dispatcher tool surfaces.

use docsearch::{
    Dispatcher, Schema, SearchConfig, SourceKind, TenantConfig, TenantError, TenantRuntime,
};
use std::sync::Arc;

fn tenant(codename: &str, dir: &std::path::Path) -> Arc<TenantRuntime> {
    let config = TenantConfig {
        codename: codename.into(),
        display_name: format!("{codename} docs"),
        description: "error-handling fixture".into(),
        source_kind: SourceKind::Filesystem,
        docs_root_dir: dir.to_path_buf(),
        example_queries: vec!["hello".into()],
        url_prefixes: vec![],
        search: SearchConfig::default(),
    };
    Arc::new(TenantRuntime::new(config, Schema::documentation_default()))
}

#[test]
fn search_before_any_publish_is_tenant_not_ready() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = tenant("unpublished", dir.path());

    let result = runtime.search("anything", 10, false);
    assert!(matches!(result, Err(TenantError::TenantNotReady)));
}

#[test]
fn empty_query_is_rejected_as_invalid_argument() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.md"), "# A\n\nhello world\n").unwrap();
    docsearch::build_segment(dir.path(), &Schema::documentation_default()).unwrap();
    let runtime = tenant("empty-query", dir.path());
    runtime.refresh().unwrap();

    let result = runtime.search("", 10, false);
    assert!(matches!(result, Err(TenantError::InvalidArgument(_))));
}

#[test]
fn fetch_of_unknown_uri_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.md"), "# A\n\nhello world\n").unwrap();
    docsearch::build_segment(dir.path(), &Schema::documentation_default()).unwrap();
    let runtime = tenant("missing-uri", dir.path());
    runtime.refresh().unwrap();

    let result = runtime.fetch("does-not-exist.md", docsearch::FetchMode::Full, None);
    assert!(matches!(result, Err(TenantError::NotFound(_))));
}

#[test]
fn browse_on_an_online_tenant_is_not_supported() {
    let dir = tempfile::tempdir().unwrap();
    let config = TenantConfig {
        codename: "crawled".into(),
        display_name: "Crawled docs".into(),
        description: "online tenant fixture".into(),
        source_kind: SourceKind::Online,
        docs_root_dir: dir.path().to_path_buf(),
        example_queries: vec![],
        url_prefixes: vec!["https://example.com/docs/".into()],
        search: SearchConfig::default(),
    };
    let runtime = TenantRuntime::new(config, Schema::documentation_default());

    let result = runtime.browse(std::path::Path::new("."), 1);
    assert!(matches!(result, Err(TenantError::NotSupported(_))));
}

#[test]
fn dispatcher_root_search_on_unknown_tenant_reports_available_codenames() {
    let mut dispatcher = Dispatcher::new();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.md"), "# A\n\nhello\n").unwrap();
    docsearch::build_segment(dir.path(), &Schema::documentation_default()).unwrap();
    dispatcher.register(tenant("known", dir.path()));

    let result = dispatcher.root_search("unknown", "hello", 10, false);
    match result {
        Err(docsearch::DispatcherError::TenantNotFound { requested, available }) => {
            assert_eq!(requested, "unknown");
            assert_eq!(available, vec!["known".to_string()]);
        }
        other => panic!("expected TenantNotFound, got {other:?}"),
    }
}
