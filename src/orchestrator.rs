//! Request pipeline around the pure orientation core.
//!
//! Classification, gating and validation always finish before the single
//! awaited engine call, so an engine failure never loses local results.

use crate::clients::GenerationEngine;
use crate::deserializers::{de_action_steps, de_forgiving_bool};
use crate::error::{CreativeOrientationError, Result};
use crate::orientation::chart::{self, ChartRequest, ChartViolation};
use crate::orientation::phase::{self, PhaseOutcome};
use crate::orientation::types::{
    BiasAnalysis, CreativePhaseSession, Focus, Phase, StructuralTension, TensionChart, non_empty,
};
use crate::orientation::{self, compose, tension};
use crate::patterns::PatternDictionary;
use crate::storage::ChartStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const DEFAULT_ENGINE_TIMEOUT_MS: u64 = 180_000;

/// One-way progress channel. Implementations must not fail or block.
pub trait ProgressSink: Send + Sync {
    fn report(&self, message: &str);
}

/// Discards progress; used by tests and the offline CLI.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _message: &str) {}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "de_forgiving_bool")]
    pub auto_correct: Option<bool>,
    #[serde(default)]
    pub focus: Focus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub analysis: BiasAnalysis,
    pub suggestions: Vec<String>,
    pub report: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reframe: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseRequest {
    #[serde(flatten)]
    pub session: CreativePhaseSession,
    /// Model hint passed through to the engine.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "de_forgiving_bool")]
    pub generate: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PhaseResponse {
    Redirect {
        detected: Vec<String>,
        artifact: String,
    },
    Artifact {
        phase: Phase,
        artifact: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        tension: Option<StructuralTension>,
        #[serde(skip_serializing_if = "Option::is_none")]
        guidance: Option<String>,
    },
}

impl PhaseResponse {
    /// Artifact text with any engine guidance appended.
    pub fn text(&self) -> String {
        match self {
            PhaseResponse::Redirect { artifact, .. } => artifact.clone(),
            PhaseResponse::Artifact {
                artifact, guidance, ..
            } => match guidance {
                Some(g) => format!("{artifact}\n\n## Engine Guidance\n{}", g.trim()),
                None => artifact.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartCreationRequest {
    #[serde(default)]
    pub desired_outcome: String,
    #[serde(default)]
    pub current_reality: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default, deserialize_with = "de_action_steps")]
    pub action_steps: Vec<String>,
    #[serde(default, deserialize_with = "de_forgiving_bool")]
    pub save_to_memory: Option<bool>,
}

impl ChartCreationRequest {
    fn chart_request(&self) -> ChartRequest {
        ChartRequest {
            desired_outcome: self.desired_outcome.clone(),
            current_reality: self.current_reality.clone(),
            due_date: self.due_date.clone(),
            action_steps: self.action_steps.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartResponse {
    Violation {
        field: &'static str,
        violation: ChartViolation,
        guidance: String,
    },
    Created {
        chart: TensionChart,
        tension: StructuralTension,
        summary: String,
        saved: bool,
    },
}

pub struct CreativeOrchestrator {
    dict: Arc<PatternDictionary>,
    engine: Arc<dyn GenerationEngine>,
    charts: Arc<dyn ChartStore>,
    generation_enabled: bool,
    engine_timeout: Duration,
}

impl CreativeOrchestrator {
    pub fn new(
        dict: Arc<PatternDictionary>,
        engine: Arc<dyn GenerationEngine>,
        charts: Arc<dyn ChartStore>,
    ) -> Self {
        Self {
            dict,
            engine,
            charts,
            generation_enabled: true,
            engine_timeout: Duration::from_millis(DEFAULT_ENGINE_TIMEOUT_MS),
        }
    }

    pub fn with_generation(mut self, enabled: bool) -> Self {
        self.generation_enabled = enabled;
        self
    }

    pub fn with_engine_timeout(mut self, timeout: Duration) -> Self {
        self.engine_timeout = timeout;
        self
    }

    pub fn dictionary(&self) -> &PatternDictionary {
        &self.dict
    }

    /// Bias check with an optional engine-written reframe.
    pub async fn check_orientation(
        &self,
        request: &AnalysisRequest,
        progress: &dyn ProgressSink,
    ) -> Result<AnalysisResponse> {
        let text = non_empty(Some(request.text.as_str())).ok_or_else(|| {
            CreativeOrientationError::missing_field("text", "text to analyze is required")
        })?;

        progress.report("Scanning for reactive language patterns");
        let outcome = orientation::analyze(text, request.focus, &self.dict);
        info!(
            "Orientation check: bias={} type={} severity={}",
            outcome.analysis.has_bias,
            outcome.analysis.bias_type,
            outcome.analysis.severity.label()
        );

        let wants_reframe = request.auto_correct.unwrap_or(false) && outcome.analysis.has_bias;
        let (report, reframe) = if wants_reframe && self.generation_enabled {
            progress.report("Requesting a creative reframe");
            let prompt = compose::reframe_prompt(text, &outcome.analysis);
            let reframe = self.call_engine(&prompt, None).await?;
            let report =
                compose::analysis_report(&outcome.analysis, &outcome.suggestions, Some(&reframe));
            (report, Some(reframe))
        } else {
            if wants_reframe {
                debug!("Auto-correct requested but generation is disabled");
            }
            (outcome.report, None)
        };

        Ok(AnalysisResponse {
            analysis: outcome.analysis,
            suggestions: outcome.suggestions,
            report,
            reframe,
        })
    }

    /// Run one phase. A gate redirect returns before the engine is consulted.
    pub async fn creative_phase(
        &self,
        request: &PhaseRequest,
        progress: &dyn ProgressSink,
    ) -> Result<PhaseResponse> {
        progress.report("Checking vision for reactive patterns");
        let artifact = match phase::run_phase(&request.session, &self.dict)? {
            PhaseOutcome::Redirect(redirect) => {
                return Ok(PhaseResponse::Redirect {
                    detected: redirect.detected,
                    artifact: redirect.artifact,
                });
            }
            PhaseOutcome::Artifact(artifact) => artifact,
        };
        if let Some(t) = &artifact.tension {
            progress.report("Scored vision and reality clarity");
            info!(
                "Assimilation tension: vision={} reality={} tension={}",
                t.vision_score, t.reality_score, t.tension
            );
        }

        let guidance = if request.generate.unwrap_or(true) && self.generation_enabled {
            progress.report("Consulting the generation engine");
            let hint = non_empty(request.model.as_deref());
            Some(self.call_engine(&artifact.prompt, hint).await?)
        } else {
            None
        };

        Ok(PhaseResponse::Artifact {
            phase: artifact.phase,
            artifact: artifact.artifact,
            tension: artifact.tension,
            guidance,
        })
    }

    /// Validate and author a chart, saving it when asked.
    pub async fn create_chart(
        &self,
        request: &ChartCreationRequest,
        now: DateTime<Utc>,
        progress: &dyn ProgressSink,
    ) -> Result<ChartResponse> {
        let chart_request = request.chart_request();
        chart_request.check_required()?;

        progress.report("Validating chart wording and due date");
        let chart = match chart::build_chart(&chart_request, now, &self.dict) {
            Ok(chart) => chart,
            Err(violation) => {
                info!("Chart rejected on {}", violation.field());
                return Ok(ChartResponse::Violation {
                    field: violation.field(),
                    guidance: violation.guidance(),
                    violation,
                });
            }
        };

        let tension = tension::calculate(&chart.desired_outcome, &chart.current_reality, &self.dict);
        let summary = compose::chart_summary(&chart, &tension);

        let saved = request.save_to_memory.unwrap_or(true);
        if saved {
            progress.report("Saving chart");
            self.charts.save(&chart).await?;
        }
        info!("Created chart {} (saved={})", chart.id, saved);

        Ok(ChartResponse::Created {
            chart,
            tension,
            summary,
            saved,
        })
    }

    pub async fn get_chart(&self, id: &str) -> Result<Option<TensionChart>> {
        let id = non_empty(Some(id))
            .ok_or_else(|| CreativeOrientationError::missing_field("id", "chart id is required"))?;
        self.charts.load(id).await
    }

    /// Direct vision/reality scoring, no gate.
    pub fn assess_tension(&self, vision: &str, current_reality: &str) -> Result<StructuralTension> {
        let vision = non_empty(Some(vision))
            .ok_or_else(|| CreativeOrientationError::missing_field("vision", "a vision is required"))?;
        let reality = non_empty(Some(current_reality)).ok_or_else(|| {
            CreativeOrientationError::missing_field("currentReality", "a current reality is required")
        })?;
        Ok(tension::calculate(vision, reality, &self.dict))
    }

    async fn call_engine(&self, prompt: &str, model_hint: Option<&str>) -> Result<String> {
        let timeout_ms = self.engine_timeout.as_millis() as u64;
        debug!("Engine call start ({} chars, hint={:?})", prompt.len(), model_hint);
        match tokio::time::timeout(self.engine_timeout, self.engine.generate(prompt, model_hint)).await
        {
            Ok(Ok(text)) => {
                debug!("Engine call finished ({} chars)", text.len());
                Ok(text)
            }
            Ok(Err(e)) => {
                warn!("Engine call failed: {}", e);
                Err(e.into())
            }
            Err(_) => {
                warn!("Engine call exceeded {}ms", timeout_ms);
                Err(CreativeOrientationError::Timeout {
                    operation: "generation engine".to_string(),
                    timeout_ms,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::AgentError;
    use crate::storage::MemoryChartStore;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::Mutex;

    struct Echo {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GenerationEngine for Echo {
        async fn generate(&self, prompt: &str, _model_hint: Option<&str>) -> std::result::Result<String, AgentError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("engine text".into())
        }
    }

    struct Stalled;

    #[async_trait]
    impl GenerationEngine for Stalled {
        async fn generate(&self, _prompt: &str, _model_hint: Option<&str>) -> std::result::Result<String, AgentError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(String::new())
        }
    }

    fn orchestrator(engine: Arc<dyn GenerationEngine>) -> CreativeOrchestrator {
        CreativeOrchestrator::new(
            Arc::new(PatternDictionary::builtin().clone()),
            engine,
            Arc::new(MemoryChartStore::new(8)),
        )
    }

    fn echo() -> Arc<Echo> {
        Arc::new(Echo {
            prompts: Mutex::new(Vec::new()),
        })
    }

    #[test]
    fn phase_request_flattens_session() {
        let req: PhaseRequest = serde_json::from_value(json!({
            "desiredOutcome": "A finished album",
            "phase": "completion",
            "currentReality": "Ten songs mixed",
            "generate": "false"
        }))
        .unwrap();
        assert_eq!(req.session.phase, Phase::Completion);
        assert_eq!(req.generate, Some(false));
        assert!(req.model.is_none());
    }

    #[tokio::test]
    async fn generation_disabled_skips_engine() {
        let engine = echo();
        let orch = orchestrator(engine.clone()).with_generation(false);
        let req = PhaseRequest {
            session: CreativePhaseSession {
                desired_outcome: "A finished album".into(),
                ..Default::default()
            },
            model: None,
            generate: None,
        };
        let resp = orch.creative_phase(&req, &NoProgress).await.unwrap();
        assert!(matches!(resp, PhaseResponse::Artifact { guidance: None, .. }));
        assert!(engine.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn stalled_engine_times_out() {
        let orch = orchestrator(Arc::new(Stalled)).with_engine_timeout(Duration::from_millis(50));
        let req = AnalysisRequest {
            text: "fix the leak".into(),
            auto_correct: Some(true),
            focus: Focus::All,
        };
        let err = orch.check_orientation(&req, &NoProgress).await.unwrap_err();
        assert!(matches!(err, CreativeOrientationError::Timeout { timeout_ms: 50, .. }));
    }

    #[tokio::test]
    async fn unsaved_chart_is_not_stored() {
        let orch = orchestrator(echo());
        let req: ChartCreationRequest = serde_json::from_value(json!({
            "desiredOutcome": "A published novel",
            "currentReality": "Two drafts exist",
            "dueDate": "2027-03-01",
            "saveToMemory": false
        }))
        .unwrap();
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let resp = orch.create_chart(&req, now, &NoProgress).await.unwrap();
        let ChartResponse::Created { chart, saved, .. } = resp else {
            panic!("expected chart");
        };
        assert!(!saved);
        assert!(orch.get_chart(&chart.id).await.unwrap().is_none());
    }

    #[test]
    fn assess_requires_both_texts() {
        let orch = orchestrator(echo());
        assert!(matches!(
            orch.assess_tension("Build a studio", " "),
            Err(CreativeOrientationError::Validation { field, .. }) if field == "currentReality"
        ));
    }
}
