//! assess_structural_tension tool handler

use crate::error::Result;
use crate::server::CreativeOrientationServer;
use crate::tools::parse_params;
use rmcp::model::{CallToolRequestParam, CallToolResult};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessTensionParams {
    #[serde(default)]
    pub vision: String,
    #[serde(default)]
    pub current_reality: String,
}

impl CreativeOrientationServer {
    pub async fn handle_assess_structural_tension(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        let params: AssessTensionParams = parse_params(request)?;
        let tension = self
            .orchestrator
            .assess_tension(&params.vision, &params.current_reality)?;
        tracing::info!(
            "Assessed tension {} ({:?})",
            tension.tension,
            tension.tier
        );
        Ok(CallToolResult::structured(serde_json::to_value(&tension)?))
    }
}
