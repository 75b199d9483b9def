//! Artifact and prompt composition.
//!
//! Plain-text markdown sections only; no decisions are made here.

use super::types::{
    BiasAnalysis, CreativePhaseSession, Phase, StructuralTension, TensionChart, non_empty,
};

const CLOSING_CALL: &str = "Next: state the result you want to create, then describe where you are now. \
The gap between the two is where creative energy comes from.";

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn numbered_list(items: &[&str]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n")
}

fn context_echo(session: &CreativePhaseSession) -> String {
    let mut lines = Vec::new();
    if let Some(t) = non_empty(session.timeframe.as_deref()) {
        lines.push(format!("**Timeframe:** {t}"));
    }
    if let Some(r) = non_empty(session.resources.as_deref()) {
        lines.push(format!("**Resources:** {r}"));
    }
    if lines.is_empty() {
        String::new()
    } else {
        format!("\n\n## Context\n{}", lines.join("\n"))
    }
}

/// Report for an analysis request: verdict, patterns, suggestions, an optional
/// engine reframe, then the closing call.
pub fn analysis_report(
    analysis: &BiasAnalysis,
    suggestions: &[String],
    reframe: Option<&str>,
) -> String {
    let mut out = String::new();
    if analysis.has_bias {
        out.push_str(&format!(
            "# Reactive Pattern Detected\n\n**Type:** {}  \n**Severity:** {}",
            analysis.bias_type,
            analysis.severity.label()
        ));
        out.push_str(&format!(
            "\n\n## Detected Patterns\n{}",
            bullet_list(&analysis.detected_patterns)
        ));
    } else {
        out.push_str("# Creative Orientation Confirmed\n\nNo reactive language patterns were found.");
    }
    if !suggestions.is_empty() {
        out.push_str(&format!("\n\n## Reframe Suggestions\n{}", bullet_list(suggestions)));
    }
    if let Some(text) = reframe {
        out.push_str(&format!("\n\n## Creative Reframe\n{}", text.trim()));
    }
    out.push_str(&format!("\n\n---\n{CLOSING_CALL}"));
    out
}

/// Prompt asking the engine to rewrite reactive text in creative terms.
pub fn reframe_prompt(text: &str, analysis: &BiasAnalysis) -> String {
    format!(
        "Rewrite the following statement in creative-orientation language: describe the \
         result to be created, not the problem to be removed. Keep the author's intent and \
         voice. Reply with the rewritten statement only.\n\n\
         Detected reactive patterns ({}): {}\n\nStatement:\n{}",
        analysis.bias_type,
        analysis.detected_patterns.join(", "),
        text.trim()
    )
}

pub fn redirect_artifact(vision: &str, detected: &[String]) -> String {
    format!(
        "# Creative Orientation Redirect\n\n\
         Your desired outcome is framed around a problem rather than a result.\n\n\
         **Stated outcome:** {}\n\n\
         ## Problem-Oriented Words\n{}\n\n\
         ## Reframe Template\n\
         \"I want to create ______, where ______ exists and ______ is true.\"\n\n\
         Ask yourself: if the problem vanished tomorrow, what would you want in its place? \
         Resubmit with that as your desired outcome.",
        vision.trim(),
        bullet_list(detected)
    )
}

pub fn germination_artifact(session: &CreativePhaseSession) -> String {
    let questions = numbered_list(&[
        "What do you want to create, in its finished form?",
        "How will you know it exists? What will you see, hear, or hold?",
        "What draws you to this outcome for its own sake?",
        "Which first steps carry the excitement of a new beginning?",
    ]);
    let reality = non_empty(session.current_reality.as_deref())
        .map(|r| format!("\n\n**Current reality:** {r}"))
        .unwrap_or_default();
    format!(
        "# Germination Phase\n\n\
         ## Vision\n{}{}\n\n\
         ## Guidance\n\
         Germination is the spark: the outcome is new and energy comes from its novelty. \
         Clarify the vision before committing to a path.\n\n{}{}",
        session.desired_outcome.trim(),
        reality,
        questions,
        context_echo(session)
    )
}

pub fn assimilation_artifact(session: &CreativePhaseSession) -> String {
    let questions = numbered_list(&[
        "What has been learned since the work began?",
        "Which actions are building momentum, and which are not?",
        "What is the next step that moves reality toward the vision?",
        "Where is the structural tension strongest right now?",
    ]);
    format!(
        "# Assimilation Phase\n\n\
         ## Vision\n{}\n\n\
         ## Current Reality\n{}\n\n\
         ## Guidance\n\
         Assimilation is the long middle: the early excitement has faded and the work \
         is internalized. Keep both the vision and the honest present in view.\n\n{}{}",
        session.desired_outcome.trim(),
        session.current_reality.as_deref().unwrap_or_default().trim(),
        questions,
        context_echo(session)
    )
}

pub fn completion_artifact(session: &CreativePhaseSession) -> String {
    let questions = numbered_list(&[
        "What remains between current reality and the finished outcome?",
        "What does finishing well look like, detail by detail?",
        "How will you acknowledge and receive the completed creation?",
        "What does this completion make possible next?",
    ]);
    format!(
        "# Completion Phase\n\n\
         ## Vision\n{}\n\n\
         ## Current Reality\n{}\n\n\
         ## Guidance\n\
         Completion brings the creation to its final form. Attend to the last details \
         and let the result be received.\n\n{}{}",
        session.desired_outcome.trim(),
        session.current_reality.as_deref().unwrap_or_default().trim(),
        questions,
        context_echo(session)
    )
}

pub fn tension_block(tension: &StructuralTension) -> String {
    format!(
        "## Structural Tension\n\
         **Vision clarity:** {}/10  \n\
         **Reality clarity:** {}/10  \n\
         **Tension:** {}/10\n\n{}",
        tension.vision_score, tension.reality_score, tension.tension, tension.energy
    )
}

/// Prompt forwarded to the generation engine for a phase artifact.
pub fn phase_prompt(session: &CreativePhaseSession, artifact: &str) -> String {
    let stance = match session.phase {
        Phase::Germination => "help the creator clarify and deepen the vision",
        Phase::Assimilation => "help the creator sustain momentum between vision and reality",
        Phase::Completion => "help the creator bring the work to its final form",
    };
    format!(
        "You are a creative-process guide working in the {} phase. Using the framework \
         below, {}. Speak in terms of outcomes to create, never problems to solve. Keep \
         the answer concise and concrete.\n\n{}",
        session.phase, stance, artifact
    )
}

pub fn chart_summary(chart: &TensionChart, tension: &StructuralTension) -> String {
    let steps = if chart.action_steps.is_empty() {
        "_No action steps yet._".to_string()
    } else {
        chart
            .action_steps
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {}", i + 1, s))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "# Structural Tension Chart `{}`\n\n\
         ## Desired Outcome\n{}\n\n\
         ## Action Steps\n{}\n\n\
         ## Current Reality\n{}\n\n\
         **Due:** {}  \n**Created:** {}\n\n{}",
        chart.id,
        chart.desired_outcome,
        steps,
        chart.current_reality,
        chart.due_date.format("%Y-%m-%d"),
        chart.created_at.to_rfc3339(),
        tension_block(tension)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::types::{BiasType, Severity, TensionTier};

    #[test]
    fn report_sections_appear_in_order() {
        let analysis = BiasAnalysis {
            has_bias: true,
            detected_patterns: vec!["fix".into()],
            bias_type: BiasType::ProblemSolving,
            severity: Severity::Low,
            suggestions: vec!["Name the result.".into()],
        };
        let report = analysis_report(&analysis, &analysis.suggestions, None);
        let header = report.find("Reactive Pattern Detected").unwrap();
        let patterns = report.find("Detected Patterns").unwrap();
        let suggestions = report.find("Reframe Suggestions").unwrap();
        let closing = report.find(CLOSING_CALL).unwrap();
        assert!(header < patterns && patterns < suggestions && suggestions < closing);
    }

    #[test]
    fn clean_report_skips_patterns_section() {
        let report = analysis_report(&BiasAnalysis::clean(), &[], None);
        assert!(report.starts_with("# Creative Orientation Confirmed"));
        assert!(!report.contains("Detected Patterns"));
        assert!(report.ends_with(CLOSING_CALL));
    }

    #[test]
    fn reframe_sits_before_closing_call() {
        let analysis = BiasAnalysis {
            has_bias: true,
            detected_patterns: vec!["fix".into()],
            bias_type: BiasType::ProblemSolving,
            severity: Severity::Low,
            suggestions: vec!["Name the result.".into()],
        };
        let report = analysis_report(&analysis, &analysis.suggestions, Some(" A calm home. \n"));
        let suggestions = report.find("Reframe Suggestions").unwrap();
        let reframe = report.find("## Creative Reframe\nA calm home.").unwrap();
        assert!(suggestions < reframe);
        assert!(reframe < report.find(CLOSING_CALL).unwrap());
        assert!(report.ends_with(CLOSING_CALL));
    }

    #[test]
    fn context_is_echoed_only_when_present() {
        let mut session = CreativePhaseSession {
            desired_outcome: "A finished album".into(),
            ..Default::default()
        };
        assert!(!germination_artifact(&session).contains("## Context"));
        session.timeframe = Some("six months".into());
        let out = germination_artifact(&session);
        assert!(out.contains("**Timeframe:** six months"));
        assert!(!out.contains("**Resources:**"));
    }

    #[test]
    fn tension_block_shows_scores() {
        let t = StructuralTension {
            vision: "v".into(),
            current_reality: "r".into(),
            vision_score: 9,
            reality_score: 7,
            tension: 7,
            tier: TensionTier::Good,
            energy: "Workable.".into(),
        };
        let block = tension_block(&t);
        assert!(block.contains("**Tension:** 7/10"));
        assert!(block.ends_with("Workable."));
    }
}
