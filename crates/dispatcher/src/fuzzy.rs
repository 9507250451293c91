//! Ranks tenants for `find_tenant`: an exact or substring match on the
//! codename or display name wins outright; otherwise candidates within a
//! small edit-distance budget are offered, closest first.

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut prev = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cur = row[j + 1];
            row[j + 1] = if ca == cb {
                prev
            } else {
                1 + prev.min(row[j]).min(cur)
            };
            prev = cur;
        }
    }
    row[b.len()]
}

/// Returns codenames ranked best-first. `haystacks` pairs each codename with
/// its display name. A case-insensitive substring hit on either field scores
/// above any edit-distance match; distance ties break by shorter display
/// name (the more specific match).
pub fn best_matches(query: &str, haystacks: &[(String, String)]) -> Vec<String> {
    let needle = query.to_lowercase();
    let max_distance = (needle.chars().count() / 3).max(1);

    let mut scored: Vec<(i64, usize, String)> = Vec::new();
    for (codename, display_name) in haystacks {
        let codename_lc = codename.to_lowercase();
        let display_lc = display_name.to_lowercase();

        if codename_lc.contains(&needle) || display_lc.contains(&needle) {
            scored.push((0, display_name.len(), codename.clone()));
            continue;
        }

        let distance = levenshtein(&needle, &codename_lc).min(levenshtein(&needle, &display_lc));
        if distance <= max_distance {
            scored.push((distance as i64 + 1, display_name.len(), codename.clone()));
        }
    }

    scored.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    scored.into_iter().map(|(_, _, codename)| codename).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_match_outranks_fuzzy_match() {
        let haystacks = vec![
            ("acme".to_string(), "Acme Widgets".to_string()),
            ("acne".to_string(), "Acne Treatments".to_string()),
        ];
        let ranked = best_matches("acme", &haystacks);
        assert_eq!(ranked[0], "acme");
    }

    #[test]
    fn typo_still_finds_closest_codename() {
        let haystacks = vec![("kubernetes".to_string(), "Kubernetes Docs".to_string())];
        let ranked = best_matches("kubernets", &haystacks);
        assert_eq!(ranked, vec!["kubernetes".to_string()]);
    }

    #[test]
    fn unrelated_query_returns_nothing() {
        let haystacks = vec![("kubernetes".to_string(), "Kubernetes Docs".to_string())];
        let ranked = best_matches("zzzzzzzzzz", &haystacks);
        assert!(ranked.is_empty());
    }
}
