//! Shared types for the creative-orientation engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lower and upper bound of every quality score.
pub const SCORE_MIN: i32 = 1;
pub const SCORE_MAX: i32 = 10;

/// Which reactive pattern dominated a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BiasType {
    ProblemSolving,
    GapFilling,
    Enhancement,
    Reactive,
    None,
}

impl BiasType {
    pub fn label(&self) -> &'static str {
        match self {
            BiasType::ProblemSolving => "problem-solving",
            BiasType::GapFilling => "gap-filling",
            BiasType::Enhancement => "enhancement",
            BiasType::Reactive => "reactive",
            BiasType::None => "none",
        }
    }
}

impl fmt::Display for BiasType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// `>3` high, `2..=3` medium, otherwise low.
    pub fn from_count(count: usize) -> Self {
        if count > 3 {
            Severity::High
        } else if count > 1 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Classifier verdict. `has_bias` is false exactly when `detected_patterns`
/// is empty and `bias_type` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasAnalysis {
    pub has_bias: bool,
    pub detected_patterns: Vec<String>,
    pub bias_type: BiasType,
    pub severity: Severity,
    pub suggestions: Vec<String>,
}

impl BiasAnalysis {
    pub fn clean() -> Self {
        Self {
            has_bias: false,
            detected_patterns: Vec::new(),
            bias_type: BiasType::None,
            severity: Severity::Low,
            suggestions: Vec::new(),
        }
    }
}

/// Which suggestion set an analysis request wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Focus {
    ProblemSolving,
    GapFilling,
    Enhancement,
    Reactive,
    #[default]
    All,
}

impl Focus {
    pub fn bias_type(&self) -> Option<BiasType> {
        match self {
            Focus::ProblemSolving => Some(BiasType::ProblemSolving),
            Focus::GapFilling => Some(BiasType::GapFilling),
            Focus::Enhancement => Some(BiasType::Enhancement),
            Focus::Reactive => Some(BiasType::Reactive),
            Focus::All => None,
        }
    }
}

/// Narrative band a tension value falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensionTier {
    Excellent,
    Good,
    VisionNeedsWork,
    RealityNeedsWork,
    BothNeedRefinement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralTension {
    pub vision: String,
    pub current_reality: String,
    pub vision_score: i32,
    pub reality_score: i32,
    /// `min(vision_score, reality_score)`
    pub tension: i32,
    pub tier: TensionTier,
    pub energy: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Germination,
    Assimilation,
    Completion,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Germination => "germination",
            Phase::Assimilation => "assimilation",
            Phase::Completion => "completion",
        }
    }

    /// Whether the phase demands a non-empty current reality.
    pub fn requires_reality(&self) -> bool {
        !matches!(self, Phase::Germination)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "germination" => Ok(Phase::Germination),
            "assimilation" => Ok(Phase::Assimilation),
            "completion" => Ok(Phase::Completion),
            other => Err(format!(
                "unknown phase '{other}' (expected germination, assimilation, or completion)"
            )),
        }
    }
}

/// Inputs to one creative-phase call. The caller picks the phase; nothing
/// here advances on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativePhaseSession {
    #[serde(default)]
    pub desired_outcome: String,
    #[serde(default)]
    pub current_reality: Option<String>,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub resources: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TensionChart {
    pub id: String,
    pub desired_outcome: String,
    pub current_reality: String,
    pub due_date: DateTime<Utc>,
    pub action_steps: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Trimmed, non-empty view of an optional field.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_boundaries() {
        assert_eq!(Severity::from_count(0), Severity::Low);
        assert_eq!(Severity::from_count(1), Severity::Low);
        assert_eq!(Severity::from_count(2), Severity::Medium);
        assert_eq!(Severity::from_count(3), Severity::Medium);
        assert_eq!(Severity::from_count(4), Severity::High);
    }

    #[test]
    fn bias_type_serializes_kebab_case() {
        let v = serde_json::to_value(BiasType::ProblemSolving).unwrap();
        assert_eq!(v, "problem-solving");
        let focus: Focus = serde_json::from_value(serde_json::json!("gap-filling")).unwrap();
        assert_eq!(focus.bias_type(), Some(BiasType::GapFilling));
    }

    #[test]
    fn phase_parses_case_insensitively() {
        assert_eq!("Assimilation".parse::<Phase>().unwrap(), Phase::Assimilation);
        assert!("harvest".parse::<Phase>().is_err());
        assert!(!Phase::Germination.requires_reality());
        assert!(Phase::Completion.requires_reality());
    }
}
