//! creative_orientation_check tool handler

use crate::error::Result;
use crate::orchestrator::{AnalysisRequest, ProgressSink};
use crate::server::CreativeOrientationServer;
use crate::tools::parse_params;
use rmcp::model::{CallToolRequestParam, CallToolResult};

impl CreativeOrientationServer {
    /// Handle the creative_orientation_check tool call
    pub async fn handle_orientation_check(
        &self,
        request: CallToolRequestParam,
        progress: &dyn ProgressSink,
    ) -> Result<CallToolResult> {
        let params: AnalysisRequest = parse_params(request)?;
        let response = self.orchestrator.check_orientation(&params, progress).await?;
        Ok(CallToolResult::structured(serde_json::to_value(&response)?))
    }
}
