//! Thread-safety tests for the tenant runtime's hot-swappable segment
//! reader and the dispatcher's shared registry.

use docsearch::{Schema, SearchConfig, SourceKind, TenantConfig, TenantRuntime};
use std::sync::Arc;
use std::thread;

fn tenant(dir: &std::path::Path) -> Arc<TenantRuntime> {
    named_tenant("concurrent", dir)
}

fn named_tenant(codename: &str, dir: &std::path::Path) -> Arc<TenantRuntime> {
    let schema = Schema::documentation_default();
    let config = TenantConfig {
        codename: codename.into(),
        display_name: format!("{codename} docs"),
        description: "concurrency fixture".into(),
        source_kind: SourceKind::Filesystem,
        docs_root_dir: dir.to_path_buf(),
        example_queries: vec!["fox".into()],
        url_prefixes: vec![],
        search: SearchConfig::default(),
    };
    Arc::new(TenantRuntime::new(config, schema))
}

#[test]
fn concurrent_searches_against_one_runtime_agree() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("fox.md"),
        "# Fox\n\nThe quick brown fox jumps over the lazy dog.\n",
    )
    .unwrap();
    docsearch::build_segment(dir.path(), &Schema::documentation_default()).unwrap();

    let runtime = tenant(dir.path());
    runtime.refresh().unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let runtime = Arc::clone(&runtime);
            thread::spawn(move || runtime.search("fox", 10, false).expect("search should succeed"))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let first = &results[0];
    for result in &results[1..] {
        assert_eq!(first.results, result.results);
    }
}

#[test]
fn refresh_during_concurrent_reads_never_panics_or_returns_stale_not_ready() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.md"), "# A\n\nhello world\n").unwrap();
    docsearch::build_segment(dir.path(), &Schema::documentation_default()).unwrap();

    let runtime = tenant(dir.path());
    runtime.refresh().unwrap();

    let readers: Vec<_> = (0..20)
        .map(|_| {
            let runtime = Arc::clone(&runtime);
            thread::spawn(move || {
                for _ in 0..25 {
                    let _ = runtime.search("hello", 5, false).expect("reader should not see TenantNotReady once published");
                }
            })
        })
        .collect();

    for _ in 0..5 {
        std::fs::write(
            dir.path().join("b.md"),
            "# B\n\nhello again, a brand new page\n",
        )
        .unwrap();
        docsearch::build_segment(dir.path(), &Schema::documentation_default()).unwrap();
        runtime.refresh().unwrap();
    }

    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn concurrent_registration_and_lookup_on_dispatcher_is_thread_safe() {
    use docsearch::Dispatcher;

    let dirs: Vec<_> = (0..8).map(|_| tempfile::tempdir().unwrap()).collect();
    let mut dispatcher = Dispatcher::new();
    for (i, dir) in dirs.iter().enumerate() {
        std::fs::write(dir.path().join("p.md"), format!("# Tenant {i}\n\nhello\n")).unwrap();
        docsearch::build_segment(dir.path(), &Schema::documentation_default()).unwrap();
        dispatcher.register(named_tenant(&format!("tenant-{i}"), dir.path()));
    }
    let dispatcher = Arc::new(dispatcher);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || dispatcher.list_tenants().len())
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), 8);
    }
}
