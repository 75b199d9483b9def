//! Creative-orientation engine: classification, scoring, gating, phase dispatch,
//! and chart validation. Deterministic and synchronous; every call is a pure
//! function of its inputs and the pattern dictionary.

pub mod bias;
pub mod chart;
pub mod compose;
pub mod gate;
pub mod phase;
pub mod quality;
pub mod tension;
pub mod types;

use crate::patterns::PatternDictionary;
use serde::Serialize;
use types::{BiasAnalysis, Focus};

/// Result of an analysis request before any engine hand-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub analysis: BiasAnalysis,
    /// Suggestions actually shown, after applying the focus.
    pub suggestions: Vec<String>,
    pub report: String,
}

/// Classify `text` and compose the report. A specific `focus` swaps in that
/// category's suggestion set; `Focus::All` keeps the detected category's.
pub fn analyze(text: &str, focus: Focus, dict: &PatternDictionary) -> AnalysisOutcome {
    let analysis = bias::classify(text, dict);
    let suggestions = match (analysis.has_bias, focus.bias_type()) {
        (false, _) => Vec::new(),
        (true, Some(focused)) => dict.suggestions(focused.label()),
        (true, None) => analysis.suggestions.clone(),
    };
    let report = compose::analysis_report(&analysis, &suggestions, None);
    AnalysisOutcome {
        analysis,
        suggestions,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::BiasType;

    #[test]
    fn focus_overrides_suggestion_set() {
        let dict = PatternDictionary::builtin();
        let all = analyze("fix it", Focus::All, dict);
        let gap = analyze("fix it", Focus::GapFilling, dict);
        assert_eq!(all.analysis.bias_type, BiasType::ProblemSolving);
        assert_eq!(gap.analysis, all.analysis);
        assert_eq!(gap.suggestions, dict.suggestions("gap-filling"));
        assert_ne!(gap.suggestions, all.suggestions);
    }

    #[test]
    fn clean_text_gets_no_suggestions() {
        let out = analyze("Grow a vegetable garden", Focus::Reactive, PatternDictionary::builtin());
        assert!(out.suggestions.is_empty());
        assert!(!out.analysis.has_bias);
    }
}
