//! Creative phase dispatch.
//!
//! Phases never advance on their own: the caller names one per call and this
//! module only gates the required fields and picks the artifact template.

use super::compose;
use super::gate::{self, GateRedirect, GateVerdict};
use super::tension;
use super::types::{CreativePhaseSession, Phase, StructuralTension, non_empty};
use crate::error::{CreativeOrientationError, Result};
use crate::patterns::PatternDictionary;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseArtifact {
    pub phase: Phase,
    pub artifact: String,
    /// Prompt handed to the generation engine when one is consulted.
    pub prompt: String,
    /// Present for assimilation only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<StructuralTension>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseOutcome {
    Redirect(GateRedirect),
    Artifact(PhaseArtifact),
}

pub fn run_phase(session: &CreativePhaseSession, dict: &PatternDictionary) -> Result<PhaseOutcome> {
    let outcome = session.desired_outcome.trim();
    if outcome.is_empty() {
        return Err(CreativeOrientationError::missing_field(
            "desiredOutcome",
            "a desired outcome is required for every phase",
        ));
    }

    if let GateVerdict::Redirect(redirect) = gate::check_vision(outcome, dict) {
        return Ok(PhaseOutcome::Redirect(redirect));
    }

    let reality = non_empty(session.current_reality.as_deref());
    if session.phase.requires_reality() && reality.is_none() {
        return Err(CreativeOrientationError::missing_field(
            "currentReality",
            format!(
                "the {} phase requires a non-empty current reality",
                session.phase
            ),
        ));
    }

    tracing::info!("Dispatching {} phase", session.phase);
    let artifact = match session.phase {
        Phase::Germination => compose::germination_artifact(session),
        Phase::Assimilation => compose::assimilation_artifact(session),
        Phase::Completion => compose::completion_artifact(session),
    };

    let tension = match (session.phase, reality) {
        (Phase::Assimilation, Some(reality)) => Some(tension::calculate(outcome, reality, dict)),
        _ => None,
    };

    let artifact = match &tension {
        Some(t) => format!("{}\n\n{}", artifact, compose::tension_block(t)),
        None => artifact,
    };

    Ok(PhaseOutcome::Artifact(PhaseArtifact {
        phase: session.phase,
        prompt: compose::phase_prompt(session, &artifact),
        artifact,
        tension,
    }))
}
