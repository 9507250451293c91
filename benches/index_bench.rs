use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use docsearch_schema::Schema;
use docsearch_segment::SegmentBuilder;
use docsearch_schema::Document;

fn sample_document(id: usize) -> Document {
    Document {
        key: format!("doc-{id}.md"),
        title: format!("Document {id}"),
        body: "The quick brown fox jumps over the lazy dog. Rust is a systems \
               programming language focused on safety and performance."
            .repeat(4),
        headings_h1: vec![format!("Document {id}")],
        headings_h2: vec!["Overview".to_string()],
        headings_other: vec![],
        code_blocks: vec![],
        url_path_tokens: format!("doc {id}"),
        metadata: serde_json::json!({ "id": id }),
    }
}

fn bench_build(c: &mut Criterion) {
    let schema = Schema::documentation_default();
    let mut group = c.benchmark_group("segment_build");

    for size in [10usize, 100, 1000] {
        let docs: Vec<Document> = (0..size).map(sample_document).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("build_{size}_docs"), |b| {
            b.iter(|| {
                let dir = tempfile::tempdir().unwrap();
                let path = dir.path().join("bench.db");
                SegmentBuilder::build(&schema, || black_box(docs.clone()).into_iter(), &path)
                    .expect("build")
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
