//! Match pattern compilation.
//!
//! All registered tags are folded into one alternation so a render scans the
//! content once, regardless of how many tags exist.

use regex::Regex;

/// Build the pattern matching any occurrence of the given tag ids.
///
/// The pattern has the shape `\{(?:id1|id2|...)(?::[^}]*)?\}`: the tag id,
/// then optional colon-separated attributes, inside braces. Ids are escaped,
/// so `a.b` only matches a literal `{a.b}`.
///
/// Returns `None` when there is nothing to match (no ids, or only empty
/// ids). Callers treat that as "matches nothing".
pub(crate) fn compile_pattern<'a>(ids: impl IntoIterator<Item = &'a str>) -> Option<Regex> {
    let mut names: Vec<&str> = ids.into_iter().filter(|id| !id.is_empty()).collect();
    if names.is_empty() {
        return None;
    }

    // Longest first, so a short id never shadows a longer one sharing its prefix
    names.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    names.dedup();

    let alternation = names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"\{{(?:{alternation})(?::[^}}]*)?\}}");

    match Regex::new(&pattern) {
        Ok(regex) => {
            tracing::debug!(tags = names.len(), "compiled tag pattern");
            Some(regex)
        }
        Err(e) => {
            // Only reachable when the alternation exceeds the regex size limit
            tracing::warn!(tags = names.len(), "failed to compile tag pattern: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches<'h>(regex: &Regex, haystack: &'h str) -> Vec<&'h str> {
        regex.find_iter(haystack).map(|m| m.as_str()).collect()
    }

    #[test]
    fn test_no_ids_compiles_to_none() {
        assert!(compile_pattern(Vec::<&str>::new()).is_none());
        assert!(compile_pattern([""]).is_none());
    }

    #[test]
    fn test_pattern_source() {
        let regex = compile_pattern(["tag"]).unwrap();
        assert_eq!(regex.as_str(), r"\{(?:tag)(?::[^}]*)?\}");
    }

    #[test]
    fn test_matches_bare_and_attributed() {
        let regex = compile_pattern(["tag"]).unwrap();
        assert_eq!(
            matches(&regex, "{tag} and {tag:a:b} and {tag:}"),
            vec!["{tag}", "{tag:a:b}", "{tag:}"]
        );
    }

    #[test]
    fn test_does_not_match_other_names() {
        let regex = compile_pattern(["tag"]).unwrap();
        assert!(matches(&regex, "{tags} {tagx:1} {other} tag {ta}").is_empty());
    }

    #[test]
    fn test_escapes_special_characters() {
        let regex = compile_pattern(["a.b"]).unwrap();
        assert_eq!(matches(&regex, "{a.b} {axb} {a-b}"), vec!["{a.b}"]);
    }

    #[test]
    fn test_shared_prefix_ids() {
        let regex = compile_pattern(["tag", "tag_with_attr"]).unwrap();
        assert_eq!(
            matches(&regex, "{tag} {tag_with_attr:x:y} {tag:z}"),
            vec!["{tag}", "{tag_with_attr:x:y}", "{tag:z}"]
        );
    }

    #[test]
    fn test_duplicate_ids() {
        let regex = compile_pattern(["tag", "tag"]).unwrap();
        assert_eq!(regex.as_str(), r"\{(?:tag)(?::[^}]*)?\}");
    }

    #[test]
    fn test_attributes_stop_at_closing_brace() {
        let regex = compile_pattern(["tag"]).unwrap();
        assert_eq!(matches(&regex, "{tag:a}b}"), vec!["{tag:a}"]);
    }

    #[test]
    fn test_unclosed_tag_is_not_matched() {
        let regex = compile_pattern(["tag"]).unwrap();
        assert!(matches(&regex, "{tag:a").is_empty());
        assert!(matches(&regex, "{tag").is_empty());
    }
}
