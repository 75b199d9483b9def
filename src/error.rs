//! Domain-specific error types for creative-orientation

use crate::clients::AgentError;
use serde_json::json;
use thiserror::Error;

/// Main error type for the creative-orientation MCP server
#[derive(Error, Debug)]
pub enum CreativeOrientationError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A required field is missing or malformed for the requested operation.
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },

    #[error("MCP protocol error: {message}")]
    Mcp { message: String },

    /// Failure reported by the external generation engine, passed through as-is.
    #[error("Generation engine error: {message}")]
    Generation { message: String },

    #[error("Chart storage error: {message}")]
    Storage { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Timeout error: {operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CreativeOrientationError {
    pub fn missing_field(field: &str, message: impl Into<String>) -> Self {
        CreativeOrientationError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for CreativeOrientationError {
    fn from(err: anyhow::Error) -> Self {
        CreativeOrientationError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CreativeOrientationError {
    fn from(err: serde_json::Error) -> Self {
        CreativeOrientationError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for CreativeOrientationError {
    fn from(err: toml::de::Error) -> Self {
        CreativeOrientationError::Config {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CreativeOrientationError {
    fn from(err: std::io::Error) -> Self {
        CreativeOrientationError::Storage {
            message: err.to_string(),
        }
    }
}

impl From<rmcp::ErrorData> for CreativeOrientationError {
    fn from(err: rmcp::ErrorData) -> Self {
        CreativeOrientationError::Mcp {
            message: err.message.to_string(),
        }
    }
}

impl From<AgentError> for CreativeOrientationError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Timeout { timeout_ms } => CreativeOrientationError::Timeout {
                operation: "generation engine".to_string(),
                timeout_ms,
            },
            other => CreativeOrientationError::Generation {
                message: other.to_string(),
            },
        }
    }
}

/// Convert CreativeOrientationError to MCP error
impl From<CreativeOrientationError> for rmcp::ErrorData {
    fn from(err: CreativeOrientationError) -> Self {
        let (code, label, details) = match err {
            CreativeOrientationError::Config { message } => (
                rmcp::model::ErrorCode::INVALID_PARAMS,
                "Configuration error",
                message,
            ),
            CreativeOrientationError::Validation { field, message } => (
                rmcp::model::ErrorCode::INVALID_PARAMS,
                "Validation error",
                format!("{field}: {message}"),
            ),
            CreativeOrientationError::InvalidParams { message } => (
                rmcp::model::ErrorCode::INVALID_PARAMS,
                "Invalid parameters",
                message,
            ),
            CreativeOrientationError::Mcp { message } => (
                rmcp::model::ErrorCode::INVALID_PARAMS,
                "MCP protocol error",
                message,
            ),
            CreativeOrientationError::Generation { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Generation engine error",
                message,
            ),
            CreativeOrientationError::Storage { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Chart storage error",
                message,
            ),
            CreativeOrientationError::Serialization { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Serialization error",
                message,
            ),
            CreativeOrientationError::Timeout {
                operation,
                timeout_ms,
            } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Operation timeout",
                format!("{operation} timed out after {timeout_ms}ms"),
            ),
            CreativeOrientationError::Internal { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Internal error",
                message,
            ),
        };

        rmcp::ErrorData {
            code,
            message: format!("{label}: {details}").into(),
            data: Some(json!({ "details": details })),
        }
    }
}

/// Result type alias for creative-orientation operations
pub type Result<T> = std::result::Result<T, CreativeOrientationError>;
