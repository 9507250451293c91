//! Analyzer profiles: deterministic `string -> [(token, position)]` functions.
//!
//! Three profiles are required by spec: [`AnalyzerProfileKind::Default`] (light
//! stemming, stopword removal), [`AnalyzerProfileKind::AggressiveStem`] (full
//! Snowball/Porter2 stemming), and [`AnalyzerProfileKind::CodeFriendly`] (keeps
//! identifiers whole *and* splits them into `snake_case`/`camelCase`/dotted
//! components). Position is assigned in scan order; when a field holds more
//! than one text value (e.g. `headings_h2`), each value's tokens start at
//! least [`FIELD_VALUE_GAP`] positions after the previous value's tokens, so a
//! phrase-proximity window never spans two unrelated headings.

use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Minimum position gap inserted between successive values of a multi-valued
/// field, so that proximity scoring cannot treat them as contiguous text.
pub const FIELD_VALUE_GAP: u32 = 128;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AnalyzerProfileKind {
    #[default]
    Default,
    AggressiveStem,
    CodeFriendly,
}

impl AnalyzerProfileKind {
    pub fn analyzer(self) -> Box<dyn Analyzer> {
        match self {
            AnalyzerProfileKind::Default => Box::new(DefaultAnalyzer),
            AnalyzerProfileKind::AggressiveStem => Box::new(AggressiveStemAnalyzer::new()),
            AnalyzerProfileKind::CodeFriendly => Box::new(CodeFriendlyAnalyzer),
        }
    }
}

/// Tokenizes a single text value into `(token, position)` pairs, position
/// starting at zero for that value.
pub trait Analyzer: Send + Sync {
    fn tokenize_one(&self, text: &str) -> Vec<(String, u32)>;
}

/// Tokenize every value of a (possibly multi-valued) field, offsetting each
/// value's positions so they never overlap with the previous value's.
pub fn tokenize_field_values(analyzer: &dyn Analyzer, values: &[&str]) -> Vec<(String, u32)> {
    let mut out = Vec::new();
    let mut base: u32 = 0;
    for value in values {
        let tokens = analyzer.tokenize_one(value);
        let mut max_pos = base;
        for (text, pos) in tokens {
            let absolute = base + pos;
            max_pos = max_pos.max(absolute + 1);
            out.push((text, absolute));
        }
        base = max_pos + FIELD_VALUE_GAP;
    }
    out
}

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is",
        "it", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there",
        "these", "they", "this", "to", "was", "will", "with",
    ]
    .into_iter()
    .collect()
});

fn normalize_and_split(text: &str) -> Vec<String> {
    let normalized: String = text.nfkc().collect::<String>().to_lowercase();
    normalized
        .unicode_words()
        .map(|w| w.to_string())
        .filter(|w| !w.is_empty())
        // unicode_words() already drops whitespace and most punctuation, but
        // isolated punctuation marks (e.g. a lone em-dash sandwiched between
        // ASCII digits) can slip through as their own "word" — drop those.
        .filter(|w| !w.chars().all(|c| c.is_punctuation() || c.is_symbol()))
        .collect()
}

/// Strips the common English inflectional suffixes without a full Snowball
/// pass — cheaper than [`AggressiveStemAnalyzer`], and the default so exact
/// phrase matches on irregular words are not lost to over-stemming.
fn light_stem(word: &str) -> String {
    for suffix in ["'s", "ing", "edly", "ed", "es", "s"] {
        if word.len() > suffix.len() + 2 && word.ends_with(suffix) {
            return word[..word.len() - suffix.len()].to_string();
        }
    }
    word.to_string()
}

pub struct DefaultAnalyzer;

impl Analyzer for DefaultAnalyzer {
    fn tokenize_one(&self, text: &str) -> Vec<(String, u32)> {
        normalize_and_split(text)
            .into_iter()
            .filter(|w| !STOPWORDS.contains(w.as_str()))
            .map(|w| light_stem(&w))
            .enumerate()
            .map(|(i, w)| (w, i as u32))
            .collect()
    }
}

pub struct AggressiveStemAnalyzer {
    stemmer: Stemmer,
}

impl AggressiveStemAnalyzer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for AggressiveStemAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for AggressiveStemAnalyzer {
    fn tokenize_one(&self, text: &str) -> Vec<(String, u32)> {
        normalize_and_split(text)
            .into_iter()
            .filter(|w| !STOPWORDS.contains(w.as_str()))
            .map(|w| self.stemmer.stem(&w).into_owned())
            .enumerate()
            .map(|(i, w)| (w, i as u32))
            .collect()
    }
}

pub struct CodeFriendlyAnalyzer;

impl CodeFriendlyAnalyzer {
    /// Splits an identifier into its `snake_case` / `camelCase` / dotted-path
    /// components, preserving order. `getUserName` -> `["get", "user",
    /// "name"]`, `foo_bar.Baz` -> `["foo", "bar", "baz"]`.
    fn split_identifier(ident: &str) -> Vec<String> {
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut prev_lower = false;
        for ch in ident.chars() {
            if ch == '_' || ch == '.' || ch == '-' {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
                prev_lower = false;
                continue;
            }
            if ch.is_uppercase() && prev_lower {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            prev_lower = ch.is_lowercase() || ch.is_numeric();
            current.extend(ch.to_lowercase());
        }
        if !current.is_empty() {
            parts.push(current);
        }
        parts.into_iter().filter(|p| !p.is_empty()).collect()
    }
}

impl Analyzer for CodeFriendlyAnalyzer {
    fn tokenize_one(&self, text: &str) -> Vec<(String, u32)> {
        let mut out = Vec::new();
        let mut pos = 0u32;
        // Split on whitespace only, keeping punctuation like `.`/`_` inside
        // identifiers so dotted paths and snake_case survive as one raw token.
        for raw in text.unicode_words_with_punctuation() {
            let whole = raw.to_lowercase();
            if whole.is_empty() {
                continue;
            }
            out.push((whole.clone(), pos));
            pos += 1;
            let parts = Self::split_identifier(&whole);
            if parts.len() > 1 {
                for part in parts {
                    out.push((part, pos));
                    pos += 1;
                }
            }
        }
        out
    }
}

/// `unicode-segmentation`'s `unicode_words()` drops the punctuation a code
/// tokenizer needs to see (`_`, `.`, `-`); this splits on whitespace instead
/// and lets [`CodeFriendlyAnalyzer::split_identifier`] do the fine-grained work.
trait UnicodeWordsWithPunctuation {
    fn unicode_words_with_punctuation(&self) -> Vec<&str>;
}

impl UnicodeWordsWithPunctuation for str {
    fn unicode_words_with_punctuation(&self) -> Vec<&str> {
        self.split_word_bounds()
            .filter(|w| w.chars().any(|c| !c.is_whitespace()))
            .filter(|w| w.chars().any(|c| c.is_alphanumeric()))
            .collect()
    }
}
