//! Pattern dictionary: versionable keyword tables behind every classifier.
//!
//! The bundled tables live in `default_patterns.toml` and are compiled into the
//! binary. Deployments can point `[patterns].path` at a replacement file, and
//! tests build minimal dictionaries with [`PatternDictionary::from_toml_str`].
//! Categories missing from a table behave as empty lists.

pub mod matcher;

use crate::error::{CreativeOrientationError, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_PATTERNS: &str = include_str!("default_patterns.toml");

const GENERIC_SUGGESTION: &str =
    "Focus on what you want to create rather than what you want to change.";

static BUILTIN: Lazy<PatternDictionary> = Lazy::new(|| {
    PatternDictionary::from_toml_str(DEFAULT_PATTERNS).expect("bundled pattern tables should parse")
});

/// Every keyword table the engine consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatternCategory {
    ProblemSolving,
    GapFilling,
    ReactiveStructural,
    EnhancementMarkers,
    GateProblem,
    VisionAction,
    VisionNegative,
    CreativeVocabulary,
    ProblemVocabulary,
    ObjectiveReality,
    JudgmentalReality,
    FutureTenseReality,
    ChartOutcomeProblem,
    ChartRealityFuture,
}

impl PatternCategory {
    pub const ALL: [PatternCategory; 14] = [
        PatternCategory::ProblemSolving,
        PatternCategory::GapFilling,
        PatternCategory::ReactiveStructural,
        PatternCategory::EnhancementMarkers,
        PatternCategory::GateProblem,
        PatternCategory::VisionAction,
        PatternCategory::VisionNegative,
        PatternCategory::CreativeVocabulary,
        PatternCategory::ProblemVocabulary,
        PatternCategory::ObjectiveReality,
        PatternCategory::JudgmentalReality,
        PatternCategory::FutureTenseReality,
        PatternCategory::ChartOutcomeProblem,
        PatternCategory::ChartRealityFuture,
    ];

    /// Table key used in the TOML file.
    pub fn label(&self) -> &'static str {
        match self {
            PatternCategory::ProblemSolving => "problem_solving",
            PatternCategory::GapFilling => "gap_filling",
            PatternCategory::ReactiveStructural => "reactive_structural",
            PatternCategory::EnhancementMarkers => "enhancement_markers",
            PatternCategory::GateProblem => "gate_problem",
            PatternCategory::VisionAction => "vision_action",
            PatternCategory::VisionNegative => "vision_negative",
            PatternCategory::CreativeVocabulary => "creative_vocabulary",
            PatternCategory::ProblemVocabulary => "problem_vocabulary",
            PatternCategory::ObjectiveReality => "objective_reality",
            PatternCategory::JudgmentalReality => "judgmental_reality",
            PatternCategory::FutureTenseReality => "future_tense_reality",
            PatternCategory::ChartOutcomeProblem => "chart_outcome_problem",
            PatternCategory::ChartRealityFuture => "chart_reality_future",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }
}

/// Narrative strings for each structural-tension tier.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TensionTiers {
    pub excellent: String,
    pub good: String,
    pub vision_needs_work: String,
    pub reality_needs_work: String,
    pub both_need_refinement: String,
}

impl Default for TensionTiers {
    fn default() -> Self {
        Self {
            excellent: "Strong structural tension.".to_string(),
            good: "Workable structural tension.".to_string(),
            vision_needs_work: "The vision needs work.".to_string(),
            reality_needs_work: "Current reality needs work.".to_string(),
            both_need_refinement: "Vision and reality both need refinement.".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawDictionary {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    generic_suggestion: Option<String>,
    #[serde(default)]
    categories: HashMap<String, Vec<String>>,
    #[serde(default)]
    suggestions: HashMap<String, Vec<String>>,
    #[serde(default)]
    tension_tiers: TensionTiers,
}

/// Immutable category -> trigger-list mapping, loaded once.
#[derive(Debug, Clone)]
pub struct PatternDictionary {
    version: String,
    categories: HashMap<PatternCategory, Vec<String>>,
    suggestions: HashMap<String, Vec<String>>,
    generic_suggestion: String,
    tension_tiers: TensionTiers,
}

impl PatternDictionary {
    /// The tables bundled with the crate.
    pub fn builtin() -> &'static PatternDictionary {
        &BUILTIN
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawDictionary = toml::from_str(content)?;

        let mut categories = HashMap::new();
        for (label, terms) in raw.categories {
            let Some(category) = PatternCategory::from_label(&label) else {
                tracing::warn!("Ignoring unknown pattern category '{}'", label);
                continue;
            };
            let terms: Vec<String> = terms
                .into_iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
            categories.insert(category, terms);
        }

        Ok(Self {
            version: raw.version.unwrap_or_else(|| "unversioned".to_string()),
            categories,
            suggestions: raw.suggestions,
            generic_suggestion: raw
                .generic_suggestion
                .unwrap_or_else(|| GENERIC_SUGGESTION.to_string()),
            tension_tiers: raw.tension_tiers,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CreativeOrientationError::Config {
            message: format!("cannot read pattern file {}: {}", path.display(), e),
        })?;
        let dict = Self::from_toml_str(&content)?;
        tracing::info!(
            "Loaded pattern dictionary v{} from {}",
            dict.version,
            path.display()
        );
        Ok(dict)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Trigger list for a category, in dictionary order.
    pub fn terms(&self, category: PatternCategory) -> &[String] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Reframing suggestions for a bias label such as `problem-solving`.
    /// Labels without a table get the single generic suggestion.
    pub fn suggestions(&self, label: &str) -> Vec<String> {
        match self.suggestions.get(label) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => vec![self.generic_suggestion.clone()],
        }
    }

    pub fn tension_tiers(&self) -> &TensionTiers {
        &self.tension_tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_cover_every_category() {
        let dict = PatternDictionary::builtin();
        for category in PatternCategory::ALL {
            assert!(
                !dict.terms(category).is_empty(),
                "{} should not be empty",
                category.label()
            );
        }
        assert_eq!(dict.version(), "1");
    }

    #[test]
    fn builtin_suggestions_have_three_entries_per_bias() {
        let dict = PatternDictionary::builtin();
        for label in ["problem-solving", "gap-filling", "enhancement", "reactive"] {
            assert_eq!(dict.suggestions(label).len(), 3, "{label}");
        }
    }

    #[test]
    fn unknown_suggestion_label_falls_back_to_generic() {
        let dict = PatternDictionary::builtin();
        let out = dict.suggestions("something-else");
        assert_eq!(out.len(), 1);
        assert!(out[0].contains("create"));
    }

    #[test]
    fn minimal_dictionary_normalizes_terms_and_skips_unknown() {
        let dict = PatternDictionary::from_toml_str(
            r#"
            [categories]
            problem_solving = ["  FIX ", ""]
            not_a_category = ["x"]
            "#,
        )
        .unwrap();
        assert_eq!(dict.terms(PatternCategory::ProblemSolving), ["fix"]);
        assert!(dict.terms(PatternCategory::GapFilling).is_empty());
        assert_eq!(dict.version(), "unversioned");
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = PatternDictionary::from_toml_str("categories = 3").unwrap_err();
        assert!(matches!(err, CreativeOrientationError::Config { .. }));
    }
}
