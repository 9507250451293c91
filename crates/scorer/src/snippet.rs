use crate::types::{SnippetConfig, SnippetStyle};

const SENTENCE_END: [char; 3] = ['.', '!', '?'];
const FRAGMENT_JOINER: &str = " … ";

/// Finds every case-insensitive occurrence of a query word inside `body`,
/// clusters nearby hits, and renders up to `config.max_fragments` fragments
/// centered on the densest clusters, each expanded to the nearest sentence
/// boundary. Falls back to the body's leading fragment when no query word
/// is found, so `fetch(..., surrounding)` always has something to show.
pub fn extract_snippet(body: &str, query: &str, config: &SnippetConfig) -> String {
    let words: Vec<String> = query
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();

    let chars: Vec<char> = body.chars().collect();
    let lower_body = body.to_lowercase();
    let clusters = densest_clusters(&lower_body, &words, config.fragment_char_limit, config.max_fragments.max(1));

    let fragments: Vec<String> = if clusters.is_empty() {
        vec![extract_fragment(&chars, 0, config.fragment_char_limit)]
    } else {
        clusters
            .into_iter()
            .map(|center| extract_fragment(&chars, center, config.fragment_char_limit))
            .collect()
    };

    fragments
        .iter()
        .map(|f| render(f.trim(), &words, config.style))
        .collect::<Vec<_>>()
        .join(FRAGMENT_JOINER)
}

/// Groups all query-word hit positions into proximity clusters (hits within
/// `fragment_char_limit` of one another belong to the same cluster), ranks
/// clusters by hit density, and returns the center offset of up to
/// `max_fragments` of the densest, in document order.
fn densest_clusters(lower_body: &str, words: &[String], fragment_char_limit: usize, max_fragments: usize) -> Vec<usize> {
    let mut hits: Vec<(usize, usize)> = words
        .iter()
        .flat_map(|w| lower_body.match_indices(w.as_str()).map(|(pos, m)| (pos, m.len())))
        .collect();
    hits.sort_unstable_by_key(|(pos, _)| *pos);
    if hits.is_empty() {
        return Vec::new();
    }

    let mut clusters: Vec<Vec<(usize, usize)>> = Vec::new();
    for hit in hits {
        let starts_new_cluster = match clusters.last() {
            Some(cluster) => {
                let (last_pos, last_len) = *cluster.last().expect("cluster is never empty");
                hit.0 > last_pos + last_len + fragment_char_limit
            }
            None => true,
        };
        if starts_new_cluster {
            clusters.push(vec![hit]);
        } else {
            clusters.last_mut().expect("just checked").push(hit);
        }
    }

    let mut ranked: Vec<(usize, usize)> = clusters
        .iter()
        .map(|cluster| {
            let min_pos = cluster.first().unwrap().0;
            let max_end = cluster.iter().map(|(pos, len)| pos + len).max().unwrap();
            let center = min_pos + (max_end - min_pos) / 2;
            (cluster.len(), center)
        })
        .collect();
    ranked.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    ranked.truncate(max_fragments);
    ranked.sort_unstable_by_key(|(_, center)| *center);
    ranked.into_iter().map(|(_, center)| center).collect()
}

/// Builds a `fragment_char_limit`-wide window centered on `center` (a byte
/// offset into the original body, used here as a char index — bodies are
/// expected to be ASCII-dominant prose), then expands it outward to the
/// nearest sentence boundary within one more fragment's width.
fn extract_fragment(chars: &[char], center: usize, fragment_char_limit: usize) -> String {
    let center = center.min(chars.len());
    let half = fragment_char_limit / 2;
    let start = center.saturating_sub(half);
    let end = (start + fragment_char_limit).min(chars.len());
    let lookaround = fragment_char_limit.saturating_mul(4);
    let (start, end) = expand_to_sentence_boundary(chars, start, end, lookaround);
    chars[start..end].iter().collect()
}

/// Expands `[start, end)` outward to the nearest sentence-ending
/// punctuation within `lookaround` chars on each side, leaving the bound
/// untouched when no boundary is found in range.
fn expand_to_sentence_boundary(chars: &[char], start: usize, end: usize, lookaround: usize) -> (usize, usize) {
    let back_limit = start.saturating_sub(lookaround);
    let expanded_start = (back_limit..start)
        .rev()
        .find(|&i| SENTENCE_END.contains(&chars[i]))
        .map(|i| i + 1)
        .unwrap_or(start);
    let expanded_start = (expanded_start..start)
        .find(|&i| !chars[i].is_whitespace())
        .unwrap_or(expanded_start);

    let forward_limit = (end + lookaround).min(chars.len());
    let expanded_end = (end..forward_limit)
        .find(|&i| SENTENCE_END.contains(&chars[i]))
        .map(|i| i + 1)
        .unwrap_or(end);

    (expanded_start, expanded_end)
}

/// Renders the `surrounding_context_chars` window around a fetch's best
/// snippet offset; used by `fetch(uri, mode = surrounding)`.
pub fn surrounding_window(body: &str, center_char: usize, context_chars: usize) -> String {
    let chars: Vec<char> = body.chars().collect();
    let center = center_char.min(chars.len());
    let start = center.saturating_sub(context_chars);
    let end = (center + context_chars).min(chars.len());
    chars[start..end].iter().collect()
}

fn render(fragment: &str, words: &[String], style: SnippetStyle) -> String {
    match style {
        SnippetStyle::Plain => bracket(fragment, words),
        SnippetStyle::Html => highlight(fragment, words),
    }
}

/// Wraps each matched query word in plain brackets, e.g. `[rust]`.
fn bracket(fragment: &str, words: &[String]) -> String {
    mark_matches(fragment, words, "[", "]", |s| s.to_string())
}

/// Wraps each matched query word in `<mark>…</mark>`, HTML-escaping the rest.
fn highlight(fragment: &str, words: &[String]) -> String {
    if words.is_empty() {
        return html_escape(fragment);
    }
    mark_matches(fragment, words, "<mark>", "</mark>", html_escape)
}

fn mark_matches(
    fragment: &str,
    words: &[String],
    open: &str,
    close: &str,
    escape: impl Fn(&str) -> String,
) -> String {
    if words.is_empty() {
        return escape(fragment);
    }
    let lower = fragment.to_lowercase();
    let mut out = String::with_capacity(fragment.len() + 16);
    let mut i = 0usize;
    let chars: Vec<char> = fragment.chars().collect();
    while i < chars.len() {
        let rest: String = chars[i..].iter().collect();
        let rest_lower = &lower[byte_offset(&lower, i)..];
        let hit = words.iter().find(|w| rest_lower.starts_with(w.as_str()));
        if let Some(w) = hit {
            let matched_len = w.chars().count().min(rest.chars().count());
            out.push_str(open);
            out.push_str(&escape(&rest[..matched_len]));
            out.push_str(close);
            i += matched_len;
        } else {
            out.push_str(&escape(&chars[i].to_string()));
            i += 1;
        }
    }
    out
}

fn byte_offset(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(b, _)| b)
        .unwrap_or(s.len())
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_and_centers_on_first_query_word() {
        let body = "a ".repeat(100) + "needle in a haystack" + &" b".repeat(100);
        let config = SnippetConfig {
            fragment_char_limit: 40,
            ..SnippetConfig::default()
        };
        let snippet = extract_snippet(&body, "needle", &config);
        assert!(snippet.contains("needle"));
    }

    #[test]
    fn falls_back_to_leading_fragment_when_no_match() {
        let config = SnippetConfig {
            fragment_char_limit: 10,
            ..SnippetConfig::default()
        };
        let snippet = extract_snippet("hello world, this is body text", "xyz", &config);
        assert_eq!(snippet, "hello worl");
    }

    #[test]
    fn html_style_wraps_matches_in_mark_tags() {
        let config = SnippetConfig {
            style: SnippetStyle::Html,
            fragment_char_limit: 20,
            ..SnippetConfig::default()
        };
        let snippet = extract_snippet("rust is great", "rust", &config);
        assert!(snippet.contains("<mark>"));
        assert!(!snippet.contains("<em>"));
    }

    #[test]
    fn plain_style_brackets_matched_terms() {
        let config = SnippetConfig {
            style: SnippetStyle::Plain,
            fragment_char_limit: 20,
            ..SnippetConfig::default()
        };
        let snippet = extract_snippet("rust is great", "rust", &config);
        assert_eq!(snippet, "[rust] is great");
    }

    #[test]
    fn emits_up_to_max_fragments_from_distinct_clusters() {
        let body = format!(
            "{}. {}. {}.",
            "needle appears here".to_string() + &" filler word".repeat(20),
            "filler word".repeat(20) + " needle shows up again",
            "filler word".repeat(20),
        );
        let config = SnippetConfig {
            fragment_char_limit: 60,
            max_fragments: 2,
            ..SnippetConfig::default()
        };
        let snippet = extract_snippet(&body, "needle", &config);
        assert_eq!(snippet.matches("needle").count(), 2);
        assert!(snippet.contains(FRAGMENT_JOINER));
    }

    #[test]
    fn expands_fragment_to_sentence_boundary() {
        let body = "Intro sentence stays out. The needle word sits inside this sentence. Trailing sentence stays out too.";
        let config = SnippetConfig {
            fragment_char_limit: 10,
            max_fragments: 1,
            ..SnippetConfig::default()
        };
        let snippet = extract_snippet(body, "needle", &config);
        assert!(snippet.starts_with("The needle word sits inside this sentence"));
        assert!(!snippet.contains("Intro"));
        assert!(!snippet.contains("Trailing"));
    }
}
