use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docsearch_schema::{Document, Schema};
use docsearch_scorer::{Scorer, SearchConfig};
use docsearch_segment::{SegmentBuilder, SegmentReader};

fn corpus(size: usize) -> Vec<Document> {
    (0..size)
        .map(|id| Document {
            key: format!("doc-{id}.md"),
            title: format!("Document {id}"),
            body: "The quick brown fox jumps over the lazy dog while rust programs \
                   index documents and score queries with bm25."
                .repeat(6),
            headings_h1: vec![format!("Document {id}")],
            headings_h2: vec!["Overview".to_string()],
            headings_other: vec![],
            code_blocks: vec![],
            url_path_tokens: format!("doc {id}"),
            metadata: serde_json::json!({}),
        })
        .collect()
}

fn bench_search(c: &mut Criterion) {
    let schema = Schema::documentation_default();
    let dir = tempfile::tempdir().unwrap();

    let mut group = c.benchmark_group("scorer_search");
    for size in [100usize, 1_000, 5_000] {
        let docs = corpus(size);
        let path = dir.path().join(format!("{size}.db"));
        SegmentBuilder::build(&schema, || docs.clone().into_iter(), &path).expect("build");
        let reader = SegmentReader::open(&path).expect("open");

        group.bench_function(format!("search_{size}_docs"), |b| {
            b.iter(|| {
                let scorer = Scorer::new(&reader, &schema, SearchConfig::default());
                scorer.search(black_box("quick brown fox"), black_box(10)).expect("search")
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
