//! End-to-end: build a segment, register two tenants, and exercise the
//! full dispatcher tool surface against them.

use docsearch::{Dispatcher, Schema, SearchConfig, SourceKind, TenantConfig, TenantRuntime};
use std::sync::Arc;
use std::time::Duration;

fn write_tenant(dispatcher: &mut Dispatcher, codename: &str, dir: &std::path::Path, body: &str) {
    std::fs::write(dir.join("page.md"), body).unwrap();
    let schema = Schema::documentation_default();
    docsearch::build_segment(dir, &schema).unwrap();

    let config = TenantConfig {
        codename: codename.into(),
        display_name: format!("{codename} docs"),
        description: format!("{codename} documentation"),
        source_kind: SourceKind::Filesystem,
        docs_root_dir: dir.to_path_buf(),
        example_queries: vec!["getting started".into()],
        url_prefixes: vec![],
        search: SearchConfig::default(),
    };
    dispatcher.register(Arc::new(TenantRuntime::new(config, schema)));
}

#[test]
fn full_pipeline_executes_across_two_tenants() {
    let acme_dir = tempfile::tempdir().unwrap();
    let globex_dir = tempfile::tempdir().unwrap();

    let mut dispatcher = Dispatcher::new();
    write_tenant(
        &mut dispatcher,
        "acme",
        acme_dir.path(),
        "# Getting Started\n\nInstall the Acme client and run `acme init`.\n",
    );
    write_tenant(
        &mut dispatcher,
        "globex",
        globex_dir.path(),
        "# Globex Setup\n\nConfigure the Globex widget factory.\n",
    );

    let schema = Schema::documentation_default();
    dispatcher.boot_time_audit(&schema, Duration::from_secs(5));

    let tenants = dispatcher.list_tenants();
    assert_eq!(tenants.len(), 2);
    assert_eq!(tenants[0].codename, "acme");
    assert_eq!(tenants[1].codename, "globex");

    let hits = dispatcher.find_tenant("globex").unwrap();
    assert!(hits.iter().any(|t| t.codename == "globex"));

    let description = dispatcher.describe_tenant("acme").unwrap();
    assert_eq!(description.codename, "acme");

    let search = dispatcher.root_search("acme", "install client", 5, false).unwrap();
    assert!(!search.results.is_empty());
    let top = &search.results[0];

    let fetch = dispatcher
        .root_fetch("acme", &top.uri, docsearch::FetchMode::Full, None)
        .unwrap();
    assert!(fetch.content.contains("acme init"));
}
