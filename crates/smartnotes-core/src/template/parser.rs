//! Field reference extraction

use regex::Regex;
use std::sync::LazyLock;

/// `{{name}}`, non-greedy, at least one character between the delimiters
///
/// The pattern is a literal, so compilation cannot fail at runtime.
pub(crate) static FIELD_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("field reference pattern compiles"));

/// Extract lowercased field references from a template
///
/// References are yielded in order of first appearance with duplicates kept.
/// An unmatched `{{` contributes nothing.
pub fn field_references(template: &str) -> impl Iterator<Item = String> + '_ {
    FIELD_REFERENCE
        .captures_iter(template)
        .map(|caps| caps[1].to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(template: &str) -> Vec<String> {
        field_references(template).collect()
    }

    #[test]
    fn test_ordered_lowercased_references() {
        assert_eq!(refs("{{A}} and {{b}}"), vec!["a", "b"]);
    }

    #[test]
    fn test_adjacent_references_are_not_merged() {
        assert_eq!(refs("{{a}}{{b}}"), vec!["a", "b"]);
    }

    #[test]
    fn test_duplicates_preserved() {
        assert_eq!(refs("{{Word}} / {{word}}"), vec!["word", "word"]);
    }

    #[test]
    fn test_no_references() {
        assert!(refs("plain prompt").is_empty());
        assert!(refs("").is_empty());
    }

    #[test]
    fn test_unmatched_delimiters_are_ignored() {
        assert!(refs("{{front").is_empty());
        assert_eq!(refs("{{front {{back}}"), vec!["front {{back"]);
        assert!(refs("{{}}").is_empty());
    }

    #[test]
    fn test_reference_with_spaces() {
        assert_eq!(refs("Define {{Word Form}}"), vec!["word form"]);
    }
}
