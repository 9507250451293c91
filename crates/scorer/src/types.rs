use std::collections::HashMap;

use docsearch_schema::AnalyzerProfileKind;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::ScorerError;

/// BM25F tuning knobs, overridable per tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankingConfig {
    #[serde(default = "RankingConfig::default_k1")]
    pub bm25_k1: f32,
    #[serde(default = "RankingConfig::default_b")]
    pub bm25_b: f32,
    #[serde(default)]
    pub enable_phrase_bonus: bool,
    #[serde(default)]
    pub enable_fuzzy: bool,
}

impl RankingConfig {
    pub(crate) fn default_k1() -> f32 {
        1.2
    }

    pub(crate) fn default_b() -> f32 {
        0.75
    }

    pub fn validate(&self) -> Result<(), ScorerError> {
        if self.bm25_k1 < 0.0 {
            return Err(ScorerError::InvalidConfig("bm25_k1 must be >= 0.0".into()));
        }
        if !(0.0..=1.0).contains(&self.bm25_b) {
            return Err(ScorerError::InvalidConfig(
                "bm25_b must be within [0.0, 1.0]".into(),
            ));
        }
        Ok(())
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            bm25_k1: Self::default_k1(),
            bm25_b: Self::default_b(),
            enable_phrase_bonus: false,
            enable_fuzzy: false,
        }
    }
}

/// Phrase-proximity window (token positions) and bonus cap, as a fraction of
/// the base BM25F score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProximityConfig {
    pub window: u32,
    pub bonus_cap_fraction: f32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            window: 8,
            bonus_cap_fraction: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SnippetStyle {
    Plain,
    Html,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnippetConfig {
    #[serde(default = "SnippetConfig::default_style")]
    pub style: SnippetStyle,
    #[serde(default = "SnippetConfig::default_fragment_char_limit")]
    pub fragment_char_limit: usize,
    #[serde(default = "SnippetConfig::default_max_fragments")]
    pub max_fragments: usize,
    #[serde(default = "SnippetConfig::default_surrounding_context_chars")]
    pub surrounding_context_chars: usize,
}

impl SnippetConfig {
    fn default_style() -> SnippetStyle {
        SnippetStyle::Plain
    }
    fn default_fragment_char_limit() -> usize {
        240
    }
    fn default_max_fragments() -> usize {
        2
    }
    fn default_surrounding_context_chars() -> usize {
        300
    }
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            style: Self::default_style(),
            fragment_char_limit: Self::default_fragment_char_limit(),
            max_fragments: Self::default_max_fragments(),
            surrounding_context_chars: Self::default_surrounding_context_chars(),
        }
    }
}

/// Per-field score multipliers; unknown field names default to 1.0 at
/// lookup time rather than being rejected (spec §4.2).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldBoosts(pub HashMap<String, f32>);

impl FieldBoosts {
    pub fn get(&self, field: &str, schema_default: f32) -> f32 {
        self.0.get(field).copied().unwrap_or(schema_default)
    }
}

/// Everything a tenant's `search` override can tune: ranking, boosts,
/// snippet rendering, phrase proximity, and which analyzer profile re-tokenizes
/// the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub boosts: FieldBoosts,
    #[serde(default)]
    pub snippet: SnippetConfig,
    #[serde(default)]
    pub proximity: ProximityConfig,
    #[serde(default)]
    pub analyzer_profile: Option<AnalyzerProfileKind>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            ranking: RankingConfig::default(),
            boosts: FieldBoosts::default(),
            snippet: SnippetConfig::default(),
            proximity: ProximityConfig::default(),
            analyzer_profile: None,
        }
    }
}

/// A single scored, ranked search hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredHit {
    pub doc_id: u32,
    pub uri: String,
    pub title: String,
    pub score: f32,
    pub snippet: String,
    pub metadata: JsonValue,
}
