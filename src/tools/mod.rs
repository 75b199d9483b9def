//! Tool handlers for the creative-orientation MCP server

pub mod creative_orientation_check;
pub mod creative_phase;
pub mod detailed_help;
pub mod structural_tension;
pub mod tension_chart;

use crate::error::{CreativeOrientationError, Result};
use rmcp::model::CallToolRequestParam;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Pull typed parameters out of a tool call.
pub(crate) fn parse_params<T: DeserializeOwned>(request: CallToolRequestParam) -> Result<T> {
    let args = request.arguments.ok_or_else(|| CreativeOrientationError::Mcp {
        message: "Missing parameters".into(),
    })?;
    serde_json::from_value(Value::Object(args)).map_err(|e| CreativeOrientationError::InvalidParams {
        message: format!("Invalid parameters: {}", e),
    })
}
