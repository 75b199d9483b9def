use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("engine timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("quota exhausted for model {model}: {detail}")]
    QuotaExhausted { model: String, detail: String },
    #[error("cli error: {0}")]
    CliError(String),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("cli executable not found")]
    NotFound,
}

/// External text-generation engine. Implementations own any retry or model
/// fallback; callers treat every failure as opaque.
#[async_trait]
pub trait GenerationEngine: Send + Sync {
    async fn generate(&self, prompt: &str, model_hint: Option<&str>) -> Result<String, AgentError>;
}
