//! Same input directory indexed twice produces the same segment
//! fingerprint and identical search results.

use docsearch::{Schema, SearchConfig, SourceKind, TenantConfig, TenantRuntime};
use std::sync::Arc;

fn write_docs(dir: &std::path::Path) {
    std::fs::write(
        dir.join("intro.md"),
        "# Introduction\n\nWelcome to the docs. This guide covers setup and configuration.\n",
    )
    .unwrap();
    std::fs::write(
        dir.join("config.md"),
        "# Configuration\n\nConfiguration is done through a YAML file.\n",
    )
    .unwrap();
}

fn tenant(dir: &std::path::Path) -> Arc<TenantRuntime> {
    let schema = Schema::documentation_default();
    let config = TenantConfig {
        codename: "det".into(),
        display_name: "Determinism".into(),
        description: "determinism fixture".into(),
        source_kind: SourceKind::Filesystem,
        docs_root_dir: dir.to_path_buf(),
        example_queries: vec!["configuration".into()],
        url_prefixes: vec![],
        search: SearchConfig::default(),
    };
    let runtime = Arc::new(TenantRuntime::new(config, schema));
    runtime.refresh().unwrap();
    runtime
}

#[test]
fn rebuilding_unchanged_source_leaves_results_identical() {
    let dir = tempfile::tempdir().unwrap();
    write_docs(dir.path());

    let schema = Schema::documentation_default();
    let meta_a = docsearch::build_segment(dir.path(), &schema).unwrap();
    let first = tenant(dir.path()).search("configuration", 10, false).unwrap();

    let meta_b = docsearch::build_segment(dir.path(), &schema).unwrap();
    let second = tenant(dir.path()).search("configuration", 10, false).unwrap();

    assert_eq!(meta_a.content_fingerprint, meta_b.content_fingerprint);
    assert_eq!(first.results.len(), second.results.len());
    for (a, b) in first.results.iter().zip(second.results.iter()) {
        assert_eq!(a.uri, b.uri);
        assert_eq!(a.score, b.score);
    }
}

#[test]
fn repeated_queries_against_one_reader_are_stable() {
    let dir = tempfile::tempdir().unwrap();
    write_docs(dir.path());
    docsearch::build_segment(dir.path(), &Schema::documentation_default()).unwrap();
    let runtime = tenant(dir.path());

    let first = runtime.search("setup", 5, false).unwrap();
    let second = runtime.search("setup", 5, false).unwrap();
    assert_eq!(first.results, second.results);
}
