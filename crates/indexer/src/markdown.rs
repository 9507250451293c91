//! Parses one normalized markdown document into a [`Document`].
//!
//! The document normalizer (git mirror / crawler / filesystem walk) is an
//! external collaborator (spec.md §6); what lands under a tenant's
//! `docs_root_dir` is already-normalized markdown, one file per document,
//! optionally preceded by a YAML front-matter block (`---\n...\n---\n`) that
//! carries pass-through metadata. This module turns that file into the
//! structured fields the schema indexes: headings by level, fenced code
//! blocks, and the body text.

use std::path::Path;

use docsearch_schema::Document;

use crate::error::IndexerError;

/// Parses `contents` (the file already read into memory) into a `Document`
/// keyed by `key` (the corpus-unique, normalized relative path).
pub fn parse_markdown_document(
    key: &str,
    contents: &str,
    source_path: &Path,
) -> Result<Document, IndexerError> {
    let (front_matter, body_text) = split_front_matter(contents);
    let metadata = match front_matter {
        Some(yaml) => serde_yaml::from_str::<serde_json::Value>(yaml)
            .map_err(|e| IndexerError::front_matter(source_path, e))?,
        None => serde_json::Value::Object(Default::default()),
    };

    let mut headings_h1 = Vec::new();
    let mut headings_h2 = Vec::new();
    let mut headings_other = Vec::new();
    let mut code_blocks = Vec::new();

    let mut in_code_block = false;
    let mut current_code = String::new();
    for line in body_text.lines() {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix("```") {
            if in_code_block {
                code_blocks.push(std::mem::take(&mut current_code).trim_end().to_string());
                in_code_block = false;
            } else {
                let _lang = rest; // fence info string, not indexed separately
                in_code_block = true;
            }
            continue;
        }
        if in_code_block {
            current_code.push_str(line);
            current_code.push('\n');
            continue;
        }
        if let Some(text) = trimmed.strip_prefix("# ") {
            headings_h1.push(text.trim().to_string());
        } else if let Some(text) = trimmed.strip_prefix("## ") {
            headings_h2.push(text.trim().to_string());
        } else if trimmed.starts_with("### ")
            || trimmed.starts_with("#### ")
            || trimmed.starts_with("##### ")
            || trimmed.starts_with("###### ")
        {
            let text = trimmed.trim_start_matches('#').trim();
            headings_other.push(text.to_string());
        }
    }
    if in_code_block && !current_code.trim().is_empty() {
        // Unterminated fence: still index whatever content it held.
        code_blocks.push(current_code.trim_end().to_string());
    }

    let title = headings_h1
        .first()
        .cloned()
        .unwrap_or_else(|| title_from_key(key));

    let url_path_tokens = key
        .trim_end_matches(".md")
        .split(|c: char| c == '/' || c == '-' || c == '_' || c == '.')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(Document {
        key: key.to_string(),
        title,
        body: body_text.trim().to_string(),
        headings_h1,
        headings_h2,
        headings_other,
        code_blocks,
        url_path_tokens,
        metadata,
    })
}

fn title_from_key(key: &str) -> String {
    key.trim_end_matches(".md")
        .rsplit('/')
        .next()
        .unwrap_or(key)
        .replace(['-', '_'], " ")
}

/// Splits a leading `---\n...\n---\n` YAML block off the front of `contents`,
/// returning `(Some(yaml), rest)` when present, `(None, contents)` otherwise.
fn split_front_matter(contents: &str) -> (Option<&str>, &str) {
    let Some(after_open) = contents.strip_prefix("---\n") else {
        return (None, contents);
    };
    match after_open.find("\n---\n") {
        Some(end) => (Some(&after_open[..end]), &after_open[end + 5..]),
        None => (None, contents),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headings_and_code_blocks() {
        let contents = "# Getting Started\n\nIntro text.\n\n## Installation\n\n```rust\nfn main() {}\n```\n\n### Notes\n\nMore text.\n";
        let doc = parse_markdown_document("guide/start.md", contents, Path::new("x")).unwrap();
        assert_eq!(doc.title, "Getting Started");
        assert_eq!(doc.headings_h1, vec!["Getting Started"]);
        assert_eq!(doc.headings_h2, vec!["Installation"]);
        assert_eq!(doc.headings_other, vec!["Notes"]);
        assert_eq!(doc.code_blocks, vec!["fn main() {}"]);
        assert_eq!(doc.url_path_tokens, "guide start");
    }

    #[test]
    fn falls_back_to_key_derived_title_without_h1() {
        let doc = parse_markdown_document("api/widgets.md", "just body text\n", Path::new("x")).unwrap();
        assert_eq!(doc.title, "widgets");
    }

    #[test]
    fn parses_front_matter_into_metadata() {
        let contents = "---\nauthor: jane\n---\n# Hello\n\nbody\n";
        let doc = parse_markdown_document("a.md", contents, Path::new("x")).unwrap();
        assert_eq!(doc.metadata["author"], "jane");
        assert_eq!(doc.title, "Hello");
    }
}
