use serde_json::{Map, Value, json};
use std::sync::Arc;

fn into_map(schema: Value) -> Arc<Map<String, Value>> {
    Arc::new(schema.as_object().cloned().unwrap_or_else(Map::new))
}

pub fn creative_orientation_check_schema() -> Arc<Map<String, Value>> {
    into_map(json!({
        "type": "object",
        "properties": {
            "text": {"type": "string", "description": "Text to check for reactive language"},
            "autoCorrect": {"type": ["boolean", "string"], "default": false},
            "focus": {
                "type": "string",
                "enum": ["problem-solving", "gap-filling", "enhancement", "reactive", "all"],
                "default": "all"
            }
        },
        "required": ["text"]
    }))
}

pub fn creative_orientation_check_output_schema() -> Arc<Map<String, Value>> {
    into_map(json!({
        "type": "object",
        "properties": {
            "analysis": {
                "type": "object",
                "properties": {
                    "hasBias": {"type": "boolean"},
                    "detectedPatterns": {"type": "array", "items": {"type": "string"}},
                    "biasType": {"type": "string"},
                    "severity": {"type": "string", "enum": ["low", "medium", "high"]},
                    "suggestions": {"type": "array", "items": {"type": "string"}}
                }
            },
            "suggestions": {"type": "array", "items": {"type": "string"}},
            "report": {"type": "string"},
            "reframe": {"type": "string"}
        },
        "required": ["analysis", "report"]
    }))
}

pub fn creative_phase_schema() -> Arc<Map<String, Value>> {
    into_map(json!({
        "type": "object",
        "properties": {
            "desiredOutcome": {"type": "string", "description": "The result you want to create"},
            "currentReality": {"type": "string", "description": "Where things stand now; required for assimilation and completion"},
            "phase": {"type": "string", "enum": ["germination", "assimilation", "completion"], "default": "germination"},
            "timeframe": {"type": "string"},
            "resources": {"type": "string"},
            "model": {"type": "string", "description": "Model hint for the generation engine"},
            "generate": {"type": ["boolean", "string"], "default": true}
        },
        "required": ["desiredOutcome"]
    }))
}

pub fn create_tension_chart_schema() -> Arc<Map<String, Value>> {
    into_map(json!({
        "type": "object",
        "properties": {
            "desiredOutcome": {"type": "string"},
            "currentReality": {"type": "string"},
            "dueDate": {"type": "string", "description": "e.g. 2026-12-31 or 2026-12-31T17:00:00Z"},
            "actionSteps": {"type": ["array", "string"], "items": {"type": "string"}},
            "saveToMemory": {"type": ["boolean", "string"], "default": true}
        },
        "required": ["desiredOutcome", "currentReality", "dueDate"]
    }))
}

pub fn get_tension_chart_schema() -> Arc<Map<String, Value>> {
    into_map(json!({
        "type": "object",
        "properties": {
            "id": {"type": "string", "description": "Chart id, e.g. chart_3f2a..."}
        },
        "required": ["id"]
    }))
}

pub fn assess_structural_tension_schema() -> Arc<Map<String, Value>> {
    into_map(json!({
        "type": "object",
        "properties": {
            "vision": {"type": "string"},
            "currentReality": {"type": "string"}
        },
        "required": ["vision", "currentReality"]
    }))
}

pub fn assess_structural_tension_output_schema() -> Arc<Map<String, Value>> {
    into_map(json!({
        "type": "object",
        "properties": {
            "vision": {"type": "string"},
            "currentReality": {"type": "string"},
            "visionScore": {"type": "integer", "minimum": 1, "maximum": 10},
            "realityScore": {"type": "integer", "minimum": 1, "maximum": 10},
            "tension": {"type": "integer", "minimum": 1, "maximum": 10},
            "tier": {"type": "string"},
            "energy": {"type": "string"}
        },
        "required": ["visionScore", "realityScore", "tension", "tier", "energy"]
    }))
}

pub fn detailed_help_schema() -> Arc<Map<String, Value>> {
    into_map(json!({
        "type": "object",
        "properties": {
            "tool": {"type": "string", "enum": [
                "creative_orientation_check", "creative_phase", "create_tension_chart",
                "get_tension_chart", "assess_structural_tension", "detailed_help"
            ]},
            "format": {"type": "string", "enum": ["compact", "full"], "default": "full"}
        },
        "required": ["tool"]
    }))
}

pub fn detailed_help_output_schema() -> Arc<Map<String, Value>> {
    into_map(json!({
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "tool": {"type": "string"},
            "description": {"type": "string"},
            "summary": {"type": "string"},
            "arguments": {"type": "object"},
            "returns": {"type": "object"}
        }
    }))
}
