//! Validation gate: the cheap check run on vision text before anything else.
//!
//! A tripped gate is not an error. It yields a complete redirect artifact and
//! nothing downstream (phase dispatch, scoring, the generation engine) runs.

use super::compose;
use crate::patterns::matcher::find_terms;
use crate::patterns::{PatternCategory, PatternDictionary};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateRedirect {
    pub detected: Vec<String>,
    pub artifact: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateVerdict {
    Pass,
    Redirect(GateRedirect),
}

impl GateVerdict {
    pub fn is_redirect(&self) -> bool {
        matches!(self, GateVerdict::Redirect(_))
    }
}

pub fn check_vision(vision: &str, dict: &PatternDictionary) -> GateVerdict {
    let detected = find_terms(vision, dict.terms(PatternCategory::GateProblem));
    if detected.is_empty() {
        return GateVerdict::Pass;
    }
    tracing::info!("Gate redirect: vision contains {:?}", detected);
    let artifact = compose::redirect_artifact(vision, &detected);
    GateVerdict::Redirect(GateRedirect { detected, artifact })
}
