//! detailed_help tool handler to provide structured help for tools

use crate::error::{CreativeOrientationError, Result};
use crate::server::CreativeOrientationServer;
use rmcp::model::{CallToolRequestParam, CallToolResult};
use serde_json::{Value, json};

/// Help document for one tool, or `None` if the name is unknown.
pub fn tool_help(tool: &str) -> Option<Value> {
    let help = match tool {
        "creative_orientation_check" => json!({
            "name": "creative_orientation_check",
            "description": "Classify text as reactive (problem-solving, gap-filling, enhancement, reactive) or creative, with reframe suggestions.",
            "arguments": {
                "text": "string (required): text to analyze",
                "autoCorrect": "boolean: ask the generation engine for a creative reframe when bias is found (default: false)",
                "focus": "string: 'problem-solving'|'gap-filling'|'enhancement'|'reactive'|'all' (default: 'all')"
            },
            "returns": {"analysis": "object", "suggestions": "string[]", "report": "string", "reframe": "string (optional)"},
            "examples": [{
                "request": {"name": "creative_orientation_check", "arguments": {"text": "I want to fix our broken process"}},
                "response": {"analysis": {"hasBias": true, "biasType": "problem-solving", "severity": "low"}}
            }]
        }),
        "creative_phase" => json!({
            "name": "creative_phase",
            "description": "Produce guidance for one creative phase. Problem-framed outcomes are redirected before any work is done.",
            "arguments": {
                "desiredOutcome": "string (required): the result to create",
                "currentReality": "string: required for assimilation and completion",
                "phase": "string: 'germination'|'assimilation'|'completion' (default: 'germination')",
                "timeframe": "string (optional)",
                "resources": "string (optional)",
                "model": "string: model hint for the generation engine",
                "generate": "boolean: consult the generation engine (default: true)"
            },
            "returns": {"status": "'redirect'|'artifact'", "artifact": "string", "tension": "object (assimilation only)", "guidance": "string (optional)", "text": "string"}
        }),
        "create_tension_chart" => json!({
            "name": "create_tension_chart",
            "description": "Create a structural tension chart. Rules run in order and the first violation is returned.",
            "arguments": {
                "desiredOutcome": "string (required): no problem words (fix, solve, eliminate, prevent, stop, avoid, reduce)",
                "currentReality": "string (required): objective present tense, no 'need to'/'should'/'will'",
                "dueDate": "string (required): future date, e.g. '2026-12-31' or RFC 3339",
                "actionSteps": "string[]: ordered steps (optional)",
                "saveToMemory": "boolean: persist through the chart store (default: true)"
            },
            "returns": {"status": "'created'|'violation'", "chart": "object", "tension": "object", "summary": "string", "saved": "boolean"}
        }),
        "get_tension_chart" => json!({
            "name": "get_tension_chart",
            "description": "Load a saved chart by id.",
            "arguments": {"id": "string (required)"},
            "returns": {"found": "boolean", "chart": "object (when found)"}
        }),
        "assess_structural_tension" => json!({
            "name": "assess_structural_tension",
            "description": "Score vision and reality clarity (1-10) and report tension = min of the two.",
            "arguments": {
                "vision": "string (required)",
                "currentReality": "string (required)"
            },
            "returns": {"visionScore": "integer", "realityScore": "integer", "tension": "integer", "tier": "string", "energy": "string"}
        }),
        "detailed_help" => json!({
            "name": "detailed_help",
            "description": "Get detailed help for a specific tool.",
            "arguments": {
                "tool": "string (required): tool name",
                "format": "string: 'compact'|'full' (default: 'full')"
            },
            "returns": {"name": "string", "description": "string", "arguments": "object"}
        }),
        _ => return None,
    };
    Some(help)
}

impl CreativeOrientationServer {
    /// Handle the detailed_help tool call
    pub async fn handle_detailed_help(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        let args = request.arguments.ok_or_else(|| CreativeOrientationError::Mcp {
            message: "Missing parameters".into(),
        })?;

        let tool = args.get("tool").and_then(|v| v.as_str()).ok_or_else(|| {
            CreativeOrientationError::missing_field("tool", "'tool' parameter is required")
        })?;
        let format = args
            .get("format")
            .and_then(|v| v.as_str())
            .unwrap_or("full");

        let help = tool_help(tool).ok_or_else(|| CreativeOrientationError::InvalidParams {
            message: format!("Unknown tool: {}", tool),
        })?;

        let output = if format == "compact" {
            json!({
                "tool": tool,
                "summary": help.get("description").cloned().unwrap_or(json!("")),
                "arguments": help.get("arguments").cloned().unwrap_or(json!({}))
            })
        } else {
            help
        };

        Ok(CallToolResult::structured(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::router::tool_catalog;

    #[test]
    fn every_listed_tool_has_help() {
        for tool in tool_catalog() {
            assert!(tool_help(&tool.name).is_some(), "no help for {}", tool.name);
        }
        assert!(tool_help("no_such_tool").is_none());
    }
}
