//! Bias classifier: turns matcher output into a [`BiasAnalysis`].
//!
//! Category precedence is a fixed chain: problem-solving, then gap-filling,
//! then the enhancement markers, then generic reactive. The order is fixed,
//! not derived from match counts: one gap-filling word beats any number of
//! enhancement markers.

use super::types::{BiasAnalysis, BiasType, Severity};
use crate::patterns::matcher::{contains_any, match_text};
use crate::patterns::{PatternCategory, PatternDictionary};

const BIAS_CATEGORIES: [PatternCategory; 3] = [
    PatternCategory::ProblemSolving,
    PatternCategory::GapFilling,
    PatternCategory::ReactiveStructural,
];

pub fn classify(text: &str, dict: &PatternDictionary) -> BiasAnalysis {
    let matches = match_text(text, dict, &BIAS_CATEGORIES);
    if matches.total() == 0 {
        return BiasAnalysis::clean();
    }
    let problem = matches.get(PatternCategory::ProblemSolving);
    let gap = matches.get(PatternCategory::GapFilling);
    let structural = matches.get(PatternCategory::ReactiveStructural);

    let detected: Vec<String> = problem
        .iter()
        .chain(gap)
        .chain(structural)
        .cloned()
        .collect();

    let (bias_type, selected) = if !problem.is_empty() {
        (BiasType::ProblemSolving, problem.len())
    } else if !gap.is_empty() {
        (BiasType::GapFilling, gap.len())
    } else if contains_any(text, dict.terms(PatternCategory::EnhancementMarkers)) {
        (BiasType::Enhancement, structural.len())
    } else {
        (BiasType::Reactive, structural.len())
    };

    let severity = Severity::from_count(selected);
    tracing::debug!(
        bias = bias_type.label(),
        severity = severity.label(),
        matches = detected.len(),
        "classified text"
    );

    BiasAnalysis {
        has_bias: true,
        detected_patterns: detected,
        bias_type,
        severity,
        suggestions: dict.suggestions(bias_type.label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict() -> &'static PatternDictionary {
        PatternDictionary::builtin()
    }

    #[test]
    fn clean_text_has_no_bias() {
        let a = classify("Establish a thriving community garden", dict());
        assert_eq!(a, BiasAnalysis::clean());
        assert_eq!(a.severity, Severity::Low);
    }

    #[test]
    fn problem_statement_is_problem_solving() {
        let a = classify("I want to fix our broken process and solve the problem", dict());
        assert!(a.has_bias);
        assert_eq!(a.bias_type, BiasType::ProblemSolving);
        assert_eq!(a.detected_patterns, vec!["fix", "solve", "problem"]);
        assert_eq!(a.severity, Severity::Medium);
        assert_eq!(a.suggestions.len(), 3);
    }

    #[test]
    fn severity_counts_selected_category_only() {
        let one = classify("fix it", dict());
        assert_eq!(one.severity, Severity::Low);
        let two = classify("fix and solve", dict());
        assert_eq!(two.severity, Severity::Medium);
        let four = classify("fix the issue to solve the problem", dict());
        assert_eq!(four.detected_patterns.len(), 4);
        assert_eq!(four.severity, Severity::High);
    }

    #[test]
    fn gap_filling_outranks_enhancement() {
        let a = classify("improve what is missing", dict());
        assert_eq!(a.bias_type, BiasType::GapFilling);
    }

    #[test]
    fn enhancement_needs_a_structural_match() {
        assert_eq!(
            classify("improve our garden", dict()).bias_type,
            BiasType::None
        );
        let a = classify("improve instead of settling", dict());
        assert_eq!(a.bias_type, BiasType::Enhancement);
        assert_eq!(a.detected_patterns, vec!["instead of"]);
        assert_eq!(a.severity, Severity::Low);
    }

    #[test]
    fn structural_phrase_alone_is_reactive() {
        let a = classify("I have to try to keep up", dict());
        assert_eq!(a.bias_type, BiasType::Reactive);
        assert_eq!(a.detected_patterns, vec!["try to", "have to"]);
        assert_eq!(a.severity, Severity::Medium);
    }

    #[test]
    fn detected_patterns_list_problem_then_gap_then_structural() {
        let a = classify("instead of the gap, fix it", dict());
        assert_eq!(a.detected_patterns, vec!["fix", "gap", "instead of"]);
    }

    #[test]
    fn invariant_has_bias_iff_patterns_iff_type() {
        for text in ["", "grow tomatoes", "stop it", "lack of time", "no longer here"] {
            let a = classify(text, dict());
            assert_eq!(!a.has_bias, a.detected_patterns.is_empty());
            assert_eq!(!a.has_bias, a.bias_type == BiasType::None);
        }
    }

    #[test]
    fn classification_is_deterministic() {
        let text = "We need to close the gap and fix the issue";
        assert_eq!(classify(text, dict()), classify(text, dict()));
    }

    #[test]
    fn minimal_dictionary_without_suggestions_uses_generic_fallback() {
        let small = PatternDictionary::from_toml_str(
            "[categories]\nproblem_solving = [\"fix\"]\n",
        )
        .unwrap();
        let a = classify("fix", &small);
        assert_eq!(a.bias_type, BiasType::ProblemSolving);
        assert_eq!(a.suggestions.len(), 1);
    }
}
