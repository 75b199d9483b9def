//! create_tension_chart and get_tension_chart tool handlers

use crate::error::Result;
use crate::orchestrator::{ChartCreationRequest, ChartResponse, ProgressSink};
use crate::server::CreativeOrientationServer;
use crate::tools::parse_params;
use chrono::Utc;
use rmcp::model::{CallToolRequestParam, CallToolResult};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct GetTensionChartParams {
    #[serde(default)]
    pub id: String,
}

impl CreativeOrientationServer {
    /// Rule violations come back as an error-flagged result naming the rule
    /// and field, not as a protocol error.
    pub async fn handle_create_tension_chart(
        &self,
        request: CallToolRequestParam,
        progress: &dyn ProgressSink,
    ) -> Result<CallToolResult> {
        let params: ChartCreationRequest = parse_params(request)?;
        let response = self
            .orchestrator
            .create_chart(&params, Utc::now(), progress)
            .await?;
        let body = serde_json::to_value(&response)?;
        Ok(match response {
            ChartResponse::Violation { .. } => CallToolResult::structured_error(body),
            ChartResponse::Created { .. } => CallToolResult::structured(body),
        })
    }

    pub async fn handle_get_tension_chart(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        let params: GetTensionChartParams = parse_params(request)?;
        match self.orchestrator.get_chart(&params.id).await? {
            Some(chart) => Ok(CallToolResult::structured(json!({
                "found": true,
                "chart": chart
            }))),
            None => Ok(CallToolResult::structured(json!({
                "found": false,
                "id": params.id.trim()
            }))),
        }
    }
}
