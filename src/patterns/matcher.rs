//! Lexical matcher: case-insensitive substring search against pattern tables.
//!
//! No tokenization is applied, so a trigger also matches inside a longer word
//! ("fix" hits "prefix"). Results keep dictionary order, not occurrence order.

use super::{PatternCategory, PatternDictionary};

/// Triggers found per category. An empty list means the category is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    matches: Vec<(PatternCategory, Vec<String>)>,
}

impl MatchResult {
    pub fn get(&self, category: PatternCategory) -> &[String] {
        self.matches
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, terms)| terms.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, category: PatternCategory) -> bool {
        !self.get(category).is_empty()
    }

    /// Total matched triggers across all categories.
    pub fn total(&self) -> usize {
        self.matches.iter().map(|(_, terms)| terms.len()).sum()
    }
}

/// Triggers from `terms` that occur anywhere in `text`, case-insensitively.
pub fn find_terms(text: &str, terms: &[String]) -> Vec<String> {
    let lowered = text.to_lowercase();
    terms
        .iter()
        .filter(|t| lowered.contains(t.as_str()))
        .cloned()
        .collect()
}

/// True when any trigger in `terms` occurs in `text`.
pub fn contains_any(text: &str, terms: &[String]) -> bool {
    let lowered = text.to_lowercase();
    terms.iter().any(|t| lowered.contains(t.as_str()))
}

/// Run the matcher for the requested categories.
pub fn match_text(
    text: &str,
    dict: &PatternDictionary,
    categories: &[PatternCategory],
) -> MatchResult {
    let lowered = text.to_lowercase();
    let matches = categories
        .iter()
        .map(|category| {
            let found = dict
                .terms(*category)
                .iter()
                .filter(|t| lowered.contains(t.as_str()))
                .cloned()
                .collect();
            (*category, found)
        })
        .collect();
    MatchResult { matches }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn matching_is_case_insensitive() {
        let found = find_terms("We must FIX this", &terms(&["fix", "solve"]));
        assert_eq!(found, vec!["fix"]);
    }

    #[test]
    fn substring_matches_inside_longer_words() {
        assert_eq!(find_terms("add a prefix", &terms(&["fix"])), vec!["fix"]);
    }

    #[test]
    fn order_follows_dictionary_not_text() {
        let found = find_terms("solve first, then fix", &terms(&["fix", "solve"]));
        assert_eq!(found, vec!["fix", "solve"]);
    }

    #[test]
    fn phrases_match_as_units() {
        let list = terms(&["get rid of"]);
        assert!(contains_any("I want to get rid of clutter", &list));
        assert!(!contains_any("get the rid of", &list));
    }

    #[test]
    fn match_text_reports_absent_categories_as_empty() {
        let dict = PatternDictionary::builtin();
        let result = match_text(
            "close the gap",
            dict,
            &[PatternCategory::ProblemSolving, PatternCategory::GapFilling],
        );
        assert!(!result.contains(PatternCategory::ProblemSolving));
        assert_eq!(result.get(PatternCategory::GapFilling), ["gap", "close the"]);
        assert_eq!(result.total(), 2);
    }

    #[test]
    fn identical_input_yields_identical_result() {
        let dict = PatternDictionary::builtin();
        let cats = PatternCategory::ALL;
        let a = match_text("Fix the gap instead of waiting", dict, &cats);
        let b = match_text("Fix the gap instead of waiting", dict, &cats);
        assert_eq!(a, b);
    }
}
