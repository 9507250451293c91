//! BM25F scoring over `docsearch-segment` segments: field-boosted term
//! scoring with an IDF floor, optional phrase-proximity bonus and bounded
//! fuzzy expansion, and snippet extraction for search results and `fetch`.

mod engine;
mod error;
mod snippet;
mod types;

pub use engine::Scorer;
pub use error::ScorerError;
pub use snippet::surrounding_window;
pub use types::{
    FieldBoosts, ProximityConfig, RankingConfig, ScoredHit, SearchConfig, SnippetConfig,
    SnippetStyle,
};

#[cfg(test)]
mod tests {
    use super::*;
    use docsearch_schema::{Document, Schema};
    use docsearch_segment::{SegmentBuilder, SegmentReader};

    fn doc(key: &str, title: &str, body: &str) -> Document {
        Document {
            key: key.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            headings_h1: vec![],
            headings_h2: vec![],
            headings_other: vec![],
            code_blocks: vec![],
            url_path_tokens: String::new(),
            metadata: serde_json::json!({}),
        }
    }

    #[test]
    fn single_document_scores_above_zero_and_snippets_the_match() {
        let schema = Schema::documentation_default();
        let docs = vec![doc("a", "hello", "hello world")];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seg.redb");
        SegmentBuilder::build(&schema, || docs.clone().into_iter(), &path).unwrap();

        let reader = SegmentReader::open(&path).unwrap();
        let scorer = Scorer::new(&reader, &schema, SearchConfig::default());
        let hits = scorer.search("hello", 10).unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].uri, "a");
        assert!(hits[0].score > 0.0);
        assert!(hits[0].snippet.to_lowercase().contains("hello"));
    }

    #[test]
    fn idf_floor_zeroes_score_when_every_document_contains_the_term() {
        let schema = Schema::documentation_default();
        let docs = vec![
            doc("a", "one", "shared cat sat"),
            doc("b", "two", "shared dog sat"),
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seg.redb");
        SegmentBuilder::build(&schema, || docs.clone().into_iter(), &path).unwrap();

        let reader = SegmentReader::open(&path).unwrap();
        let scorer = Scorer::new(&reader, &schema, SearchConfig::default());
        let hits = scorer.search("shared", 10).unwrap();

        assert_eq!(hits.len(), 2);
        for hit in &hits {
            assert!(hit.score >= 0.0);
            assert_eq!(hit.score, 0.0);
        }
        // Tie-broken by ascending doc_id, i.e. insertion order "a" then "b".
        assert_eq!(hits[0].uri, "a");
        assert_eq!(hits[1].uri, "b");
    }
}
