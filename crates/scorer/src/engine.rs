use std::collections::{HashMap, HashSet};

use docsearch_schema::{tokenize_field_values, Schema};
use docsearch_segment::{Posting, SegmentReader};

use crate::error::ScorerError;
use crate::snippet::extract_snippet;
use crate::types::{ScoredHit, SearchConfig};

/// Per-(field, term) BM25F contribution, computed once and reused both for
/// the base score sum and for the phrase-proximity pass.
struct TermField {
    field_id: u16,
    term: String,
    boost: f32,
    idf: f32,
    postings: Vec<Posting>,
}

/// Scores and ranks documents in one segment against a free-text query.
pub struct Scorer<'a> {
    reader: &'a SegmentReader,
    schema: &'a Schema,
    config: SearchConfig,
}

impl<'a> Scorer<'a> {
    pub fn new(reader: &'a SegmentReader, schema: &'a Schema, config: SearchConfig) -> Self {
        Self {
            reader,
            schema,
            config,
        }
    }

    pub fn search(&self, query: &str, size: usize) -> Result<Vec<ScoredHit>, ScorerError> {
        self.config.ranking.validate()?;

        let stats = self.reader.collection_stats();
        let n = stats.doc_count as f32;

        let term_fields = self.collect_term_fields(query)?;

        let mut base_scores: HashMap<u32, f32> = HashMap::new();
        // field_id -> term -> doc_id -> positions, kept only for the phrase
        // bonus pass; dropped once scoring for this query is done.
        let mut positions_by_field: HashMap<u16, HashMap<&str, HashMap<u32, &[u32]>>> =
            HashMap::new();

        for tf in &term_fields {
            let avg_len = stats.avg_field_length(tf.field_id);
            if avg_len <= 0.0 {
                continue;
            }
            for posting in &tf.postings {
                let term_freq = posting.positions.len() as f32;
                let doc_len = self
                    .reader
                    .field_length(tf.field_id, posting.doc_id)?
                    .max(1) as f32;
                let k1 = self.config.ranking.bm25_k1;
                let b = self.config.ranking.bm25_b;
                let denom = term_freq + k1 * (1.0 - b + b * doc_len / avg_len);
                let contribution = tf.boost * tf.idf * (term_freq * (k1 + 1.0)) / denom;
                *base_scores.entry(posting.doc_id).or_insert(0.0) += contribution;

                positions_by_field
                    .entry(tf.field_id)
                    .or_default()
                    .entry(tf.term.as_str())
                    .or_default()
                    .insert(posting.doc_id, posting.positions.as_slice());
            }
        }
        // `n` participates only through idf(), already folded into each
        // TermField; keep the binding so the formula's `N` stays legible.
        let _ = n;

        let mut scored: Vec<(u32, f32)> = base_scores
            .into_iter()
            .map(|(doc_id, base)| {
                let bonus = if self.config.ranking.enable_phrase_bonus {
                    self.phrase_bonus(doc_id, base, &positions_by_field)
                } else {
                    0.0
                };
                (doc_id, base + bonus)
            })
            .collect();

        scored.sort_by(|a, b| match b.1.partial_cmp(&a.1) {
            Some(std::cmp::Ordering::Equal) | None => a.0.cmp(&b.0),
            Some(ordering) => ordering,
        });
        scored.truncate(size);

        scored
            .into_iter()
            .map(|(doc_id, score)| self.build_hit(doc_id, score, query))
            .collect()
    }

    /// Tokenizes the query once per distinct analyzer profile in use across
    /// indexed fields, resolves idf and postings for every `(field, term)`
    /// pair, and optionally widens the term set with bounded edit-distance-1
    /// fuzzy neighbors that actually occur in the corpus.
    fn collect_term_fields(&self, query: &str) -> Result<Vec<TermField>, ScorerError> {
        let stats = self.reader.collection_stats();
        let n = stats.doc_count as f32;
        let mut out = Vec::new();

        for field in self.schema.indexed_fields() {
            let field_id = self
                .schema
                .field_id(&field.name)
                .expect("indexed field is always present in its own schema");
            let profile = self.config.analyzer_profile.unwrap_or(field.analyzer_profile);
            let analyzer = profile.analyzer();
            let tokens = tokenize_field_values(analyzer.as_ref(), &[query]);

            let mut seen: HashSet<String> = HashSet::new();
            let mut terms: Vec<String> = Vec::new();
            for (term, _pos) in tokens {
                if seen.insert(term.clone()) {
                    terms.push(term);
                }
            }

            if self.config.ranking.enable_fuzzy {
                let originals = terms.clone();
                for term in &originals {
                    for candidate in fuzzy_neighbors(term) {
                        if seen.insert(candidate.clone())
                            && self.reader.document_frequency(field_id, &candidate)? > 0
                        {
                            terms.push(candidate);
                        }
                    }
                }
            }

            let boost = self.config.boosts.get(&field.name, field.boost);

            for term in terms {
                let df = self.reader.document_frequency(field_id, &term)?;
                if df == 0 {
                    continue;
                }
                let idf = idf_floor(n, df as f32);
                let postings = self.reader.docs_for_term(field_id, &term)?;
                out.push(TermField {
                    field_id,
                    term,
                    boost,
                    idf,
                    postings,
                });
            }
        }

        Ok(out)
    }

    fn phrase_bonus(
        &self,
        doc_id: u32,
        base_score: f32,
        positions_by_field: &HashMap<u16, HashMap<&str, HashMap<u32, &[u32]>>>,
    ) -> f32 {
        let window = self.config.proximity.window;
        let cap = base_score * self.config.proximity.bonus_cap_fraction;

        for terms in positions_by_field.values() {
            let mut per_term_positions: Vec<&[u32]> = Vec::new();
            for by_doc in terms.values() {
                if let Some(positions) = by_doc.get(&doc_id) {
                    per_term_positions.push(positions);
                }
            }
            if per_term_positions.len() < 2 {
                continue;
            }
            for i in 0..per_term_positions.len() {
                for j in (i + 1)..per_term_positions.len() {
                    if positions_within_window(per_term_positions[i], per_term_positions[j], window) {
                        return cap;
                    }
                }
            }
        }
        0.0
    }

    fn build_hit(&self, doc_id: u32, score: f32, query: &str) -> Result<ScoredHit, ScorerError> {
        let stored = self
            .reader
            .stored_document(doc_id)?
            .ok_or_else(|| ScorerError::MissingStoredDocument(doc_id.to_string()))?;

        let title = stored
            .fields
            .get("title")
            .and_then(|v| v.first())
            .cloned()
            .unwrap_or_default();
        let body = stored
            .fields
            .get("body")
            .and_then(|v| v.first())
            .cloned()
            .unwrap_or_default();

        let snippet = extract_snippet(&body, query, &self.config.snippet);

        Ok(ScoredHit {
            doc_id,
            uri: stored.key,
            title,
            score,
            snippet,
            metadata: stored.metadata,
        })
    }
}

fn idf_floor(n: f32, df: f32) -> f32 {
    (((n - df + 0.5) / (df + 0.5)) + 1.0).ln().max(0.0)
}

fn positions_within_window(a: &[u32], b: &[u32], window: u32) -> bool {
    // Both slices are ascending; a two-pointer sweep finds the minimum gap
    // in O(|a| + |b|).
    let (mut i, mut j) = (0usize, 0usize);
    while i < a.len() && j < b.len() {
        let diff = a[i].abs_diff(b[j]);
        if diff <= window {
            return true;
        }
        if a[i] < b[j] {
            i += 1;
        } else {
            j += 1;
        }
    }
    false
}

/// Bounded edit-distance-1 neighbor generation (deletions, substitutions,
/// adjacent transpositions, and single-character insertions over the
/// lowercase ASCII alphabet) so fuzzy expansion cannot blow up on long or
/// unusual terms.
fn fuzzy_neighbors(term: &str) -> Vec<String> {
    const MAX_CANDIDATES: usize = 64;
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

    let mut out = Vec::new();
    let chars: Vec<char> = term.chars().collect();

    // Deletions.
    for i in 0..chars.len() {
        if out.len() >= MAX_CANDIDATES {
            return out;
        }
        let mut s = chars.clone();
        s.remove(i);
        out.push(s.into_iter().collect());
    }

    // Adjacent transpositions.
    for i in 0..chars.len().saturating_sub(1) {
        if out.len() >= MAX_CANDIDATES {
            return out;
        }
        let mut s = chars.clone();
        s.swap(i, i + 1);
        out.push(s.into_iter().collect());
    }

    // Substitutions and insertions, capped at the alphabet scan so a single
    // long term cannot generate an unbounded candidate set.
    'outer: for i in 0..=chars.len() {
        for &b in ALPHABET {
            if out.len() >= MAX_CANDIDATES {
                break 'outer;
            }
            let c = b as char;
            if i < chars.len() {
                if chars[i] == c {
                    continue;
                }
                let mut s = chars.clone();
                s[i] = c;
                out.push(s.into_iter().collect());
            }
            let mut s = chars.clone();
            s.insert(i, c);
            out.push(s.into_iter().collect());
        }
    }

    out
}
