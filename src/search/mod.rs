use itertools::Itertools;

pub mod rank;

/// queries shorter than this after trimming carry no text search at all
pub const MIN_QUERY_LENGTH: usize = 2;
/// single-word queries at least this long also match on their left-anchored prefixes,
/// so "doc" keeps matching while the user is still typing "document"
const MIN_PREFIX_LENGTH: usize = 3;

/// a free-text query turned into the match patterns the store filters on and the
/// scoring hints the ranker re-sorts with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSpec {
    /// substring-containment patterns with `%text%` wildcard semantics, ORed together
    /// against both name fields by the filter stage
    pub patterns: Vec<String>,
    /// the individual normalized words of the query
    pub words: Vec<String>,
    /// the raw query, trimmed but case-preserved
    pub original_query: String,
}

/// the single normalization rule for tag and query comparison everywhere: trim + lowercase
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// turns a raw query string into a [SearchSpec], or `None` when the query is too short
/// to search on (tag/view filters still apply in that case).
///
/// Patterns are, in order: the full phrase; each individual word when there is more than
/// one; for a single word of length >= 3, every left-anchored prefix from length 3 up to
/// (but excluding) the full word, which the phrase pattern already covers.
pub fn build_search_spec(query: &str) -> Option<SearchSpec> {
    let normalized = normalize(query);
    if normalized.chars().count() < MIN_QUERY_LENGTH {
        return None;
    }
    let words: Vec<String> = normalized.split_whitespace().map(String::from).collect();
    let mut patterns: Vec<String> = vec![format!("%{normalized}%")];
    if words.len() > 1 {
        for word in words.iter() {
            patterns.push(format!("%{word}%"));
        }
    } else if let Some(word) = words.first() {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() >= MIN_PREFIX_LENGTH {
            for len in MIN_PREFIX_LENGTH..chars.len() {
                let prefix: String = chars[..len].iter().collect();
                patterns.push(format!("%{prefix}%"));
            }
        }
    }
    let patterns = patterns.into_iter().unique().collect();
    Some(SearchSpec {
        patterns,
        words,
        original_query: query.trim().to_string(),
    })
}

/// trims every entry, drops empties, and removes duplicates under [normalize], keeping
/// the first-seen casing. Run on every tag array before it is written
pub fn dedupe_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .unique_by(|tag| normalize(tag))
        .collect()
}

#[cfg(test)]
mod build_search_spec_tests {
    use super::build_search_spec;

    #[test]
    fn returns_none_for_short_queries() {
        assert_eq!(None, build_search_spec(""));
        assert_eq!(None, build_search_spec("a"));
        assert_eq!(None, build_search_spec("   a   "));
        assert_eq!(None, build_search_spec(" \t "));
    }

    #[test]
    fn two_character_query_is_processed() {
        let spec = build_search_spec("ab").unwrap();
        assert_eq!(vec!["%ab%".to_string()], spec.patterns);
        assert_eq!(vec!["ab".to_string()], spec.words);
    }

    #[test]
    fn phrase_pattern_is_always_present() {
        let spec = build_search_spec("  Quarterly Report  ").unwrap();
        assert!(spec.patterns.contains(&"%quarterly report%".to_string()));
        assert_eq!("Quarterly Report", spec.original_query);
    }

    #[test]
    fn multi_word_query_adds_per_word_patterns() {
        let spec = build_search_spec("Budget Report").unwrap();
        assert_eq!(
            vec![
                "%budget report%".to_string(),
                "%budget%".to_string(),
                "%report%".to_string()
            ],
            spec.patterns
        );
        assert_eq!(vec!["budget".to_string(), "report".to_string()], spec.words);
    }

    #[test]
    fn single_word_query_adds_prefix_patterns() {
        let spec = build_search_spec("document").unwrap();
        // one entry per prefix length from 3 to the full word, full word first
        assert_eq!(
            vec![
                "%document%".to_string(),
                "%doc%".to_string(),
                "%docu%".to_string(),
                "%docum%".to_string(),
                "%docume%".to_string(),
                "%documen%".to_string(),
            ],
            spec.patterns
        );
    }

    #[test]
    fn short_single_word_gets_no_prefixes() {
        let spec = build_search_spec("ab").unwrap();
        assert_eq!(1, spec.patterns.len());
        let spec = build_search_spec("doc").unwrap();
        assert_eq!(vec!["%doc%".to_string()], spec.patterns);
    }

    #[test]
    fn no_duplicate_patterns() {
        let spec = build_search_spec("docs docs").unwrap();
        assert_eq!(
            vec!["%docs docs%".to_string(), "%docs%".to_string()],
            spec.patterns
        );
    }
}

#[cfg(test)]
mod dedupe_tags_tests {
    use super::dedupe_tags;

    #[test]
    fn removes_case_insensitive_duplicates_keeping_first_casing() {
        let tags = vec![
            "Design".to_string(),
            "design".to_string(),
            " DESIGN ".to_string(),
            "approved".to_string(),
        ];
        assert_eq!(
            vec!["Design".to_string(), "approved".to_string()],
            dedupe_tags(tags)
        );
    }

    #[test]
    fn drops_empty_and_whitespace_entries() {
        let tags = vec!["".to_string(), "   ".to_string(), "kept".to_string()];
        assert_eq!(vec!["kept".to_string()], dedupe_tags(tags));
    }

    #[test]
    fn trims_entries() {
        assert_eq!(
            vec!["finance".to_string()],
            dedupe_tags(vec!["  finance  ".to_string()])
        );
    }
}
