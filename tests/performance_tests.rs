//! Coarse performance smoke tests: building a moderately sized segment
//! and searching it should stay within generous time bounds on any
//! reasonable hardware. These are sanity checks against regressions, not
//! benchmarks — see `benches/` for actual measurement.

use docsearch::{Schema, SearchConfig, SourceKind, TenantConfig, TenantRuntime};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn generate_markdown(doc_index: usize, word_count: usize) -> String {
    let words = [
        "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "rust", "search",
        "index", "segment", "tenant", "query", "score", "relevance", "document", "configure",
    ];
    let mut body = format!("# Document {doc_index}\n\n");
    for i in 0..word_count {
        if i > 0 {
            body.push(' ');
        }
        body.push_str(words[(i + doc_index) % words.len()]);
    }
    body.push('\n');
    body
}

#[test]
fn building_a_few_hundred_documents_completes_quickly() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..200 {
        std::fs::write(dir.path().join(format!("doc-{i}.md")), generate_markdown(i, 150)).unwrap();
    }

    let schema = Schema::documentation_default();
    let start = Instant::now();
    let meta = docsearch::build_segment(dir.path(), &schema).unwrap();
    let elapsed = start.elapsed();

    assert_eq!(meta.doc_count, 200);
    assert!(
        elapsed < Duration::from_secs(20),
        "building 200 small documents took {elapsed:?}, expected under 20s",
    );
}

#[test]
fn repeated_searches_against_a_warm_reader_stay_fast() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..100 {
        std::fs::write(dir.path().join(format!("doc-{i}.md")), generate_markdown(i, 200)).unwrap();
    }
    docsearch::build_segment(dir.path(), &Schema::documentation_default()).unwrap();

    let config = TenantConfig {
        codename: "perf".into(),
        display_name: "Perf docs".into(),
        description: "performance fixture".into(),
        source_kind: SourceKind::Filesystem,
        docs_root_dir: dir.path().to_path_buf(),
        example_queries: vec!["fox".into()],
        url_prefixes: vec![],
        search: SearchConfig::default(),
    };
    let runtime = Arc::new(TenantRuntime::new(config, Schema::documentation_default()));
    runtime.refresh().unwrap();

    let start = Instant::now();
    for _ in 0..50 {
        let response = runtime.search("fox jumps", 10, false).unwrap();
        assert!(!response.results.is_empty());
    }
    let elapsed = start.elapsed();

    assert!(
        elapsed < Duration::from_secs(5),
        "50 searches against 100 documents took {elapsed:?}, expected under 5s",
    );
}
