//! creative_phase tool handler

use crate::error::Result;
use crate::orchestrator::{PhaseRequest, ProgressSink};
use crate::server::CreativeOrientationServer;
use crate::tools::parse_params;
use rmcp::model::{CallToolRequestParam, CallToolResult};

impl CreativeOrientationServer {
    /// Handle the creative_phase tool call. A gate redirect is a normal
    /// result; a missing phase field surfaces as an invalid-params error.
    pub async fn handle_creative_phase(
        &self,
        request: CallToolRequestParam,
        progress: &dyn ProgressSink,
    ) -> Result<CallToolResult> {
        let params: PhaseRequest = parse_params(request)?;
        let response = self.orchestrator.creative_phase(&params, progress).await?;

        let mut body = serde_json::to_value(&response)?;
        body["text"] = serde_json::Value::String(response.text());
        Ok(CallToolResult::structured(body))
    }
}
