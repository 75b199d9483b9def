//! Server module containing the CreativeOrientationServer implementation

use crate::clients::{GeminiClient, GenerationEngine};
use crate::config::Config;
use crate::error::Result;
use crate::orchestrator::{CreativeOrchestrator, ProgressSink};
use crate::storage::{ChartStore, create_chart_store};
use rmcp::model::{LoggingLevel, LoggingMessageNotificationParam};
use rmcp::service::{Peer, RoleServer};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub mod router;

#[derive(Clone)]
pub struct CreativeOrientationServer {
    pub orchestrator: Arc<CreativeOrchestrator>,
}

impl CreativeOrientationServer {
    /// Wire the Gemini engine and the configured chart store.
    pub fn new(config: Config) -> Result<Self> {
        let gemini = GeminiClient::from_config(&config.generation);
        info!("Generation engine: gemini CLI (model {})", gemini.model());
        let engine: Arc<dyn GenerationEngine> = Arc::new(gemini);
        let charts = create_chart_store(&config);
        Self::with_collaborators(config, engine, charts)
    }

    pub fn with_collaborators(
        config: Config,
        engine: Arc<dyn GenerationEngine>,
        charts: Arc<dyn ChartStore>,
    ) -> Result<Self> {
        let dict = config.load_patterns()?;
        info!(
            "Pattern dictionary v{} loaded (generation enabled: {})",
            dict.version(),
            config.generation.enabled
        );
        let orchestrator = CreativeOrchestrator::new(Arc::new(dict), engine, charts)
            .with_generation(config.generation.enabled)
            .with_engine_timeout(Duration::from_millis(config.runtime.tool_timeout_ms));
        Ok(Self {
            orchestrator: Arc::new(orchestrator),
        })
    }
}

/// Forwards progress as MCP logging notifications. Sends are spawned and
/// failures only logged, so a slow or gone client never stalls a tool.
pub struct PeerProgress {
    peer: Peer<RoleServer>,
    tool: &'static str,
}

impl PeerProgress {
    pub fn new(peer: Peer<RoleServer>, tool: &'static str) -> Self {
        Self { peer, tool }
    }
}

impl ProgressSink for PeerProgress {
    fn report(&self, message: &str) {
        let peer = self.peer.clone();
        let param = LoggingMessageNotificationParam {
            level: LoggingLevel::Info,
            logger: Some("creative-orientation".to_string()),
            data: json!({ "tool": self.tool, "message": message }),
        };
        tokio::spawn(async move {
            if let Err(e) = peer.notify_logging_message(param).await {
                tracing::debug!("Progress notification dropped: {}", e);
            }
        });
    }
}
