use crate::patterns::PatternDictionary;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure loaded from creative_orientation.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub generation: GenerationConfig,
    pub charts: ChartConfig,
    pub patterns: PatternsConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// External generation engine (Gemini CLI) settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// When false, phase and auto-correct requests return local artifacts only
    pub enabled: bool,
    pub model: String,
    pub fallback_model: Option<String>,
    /// Inactivity threshold for the CLI subprocess
    pub timeout_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "auto".to_string(),
            fallback_model: Some("gemini-2.5-flash".to_string()),
            timeout_ms: 120_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    /// "memory" or "file"
    pub store: String,
    pub dir: Option<PathBuf>,
    /// Upper bound on charts kept by the in-memory store
    pub capacity: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            store: "memory".to_string(),
            dir: None,
            capacity: 256,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternsConfig {
    /// Replacement pattern table; the bundled one is used when unset
    pub path: Option<PathBuf>,
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_level: String,
    pub mcp_no_log: bool,
    /// Caller-level timeout around one engine call
    pub tool_timeout_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "creative_orientation=info,rmcp=info".to_string(),
            mcp_no_log: false,
            tool_timeout_ms: 180_000,
        }
    }
}

impl RuntimeConfig {
    pub fn load_from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: std::env::var("RUST_LOG")
                .or_else(|_| std::env::var("CO_LOG_LEVEL"))
                .unwrap_or(defaults.log_level),
            mcp_no_log: std::env::var("CO_MCP_NO_LOG")
                .ok()
                .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true")),
            tool_timeout_ms: std::env::var("CO_TOOL_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.tool_timeout_ms),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses CREATIVE_ORIENTATION_CONFIG or defaults to "creative_orientation.toml"
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(env_path) = std::env::var("CO_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::dotenv();
        }

        let config_path = std::env::var("CREATIVE_ORIENTATION_CONFIG")
            .unwrap_or_else(|_| "creative_orientation.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            toml::from_str(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();
        config.runtime = RuntimeConfig::load_from_env();
        config.validate()?;
        Ok(config)
    }

    /// Env-first overrides for file settings
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("CO_GENERATION_ENABLED") {
            self.generation.enabled = !(v == "0" || v.eq_ignore_ascii_case("false"));
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            self.generation.model = model;
        }
        if let Ok(fallback) = std::env::var("GEMINI_FALLBACK_MODEL") {
            self.generation.fallback_model = Some(fallback).filter(|m| !m.is_empty());
        }
        if let Some(ms) = std::env::var("GEMINI_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.generation.timeout_ms = ms;
        }
        if let Ok(store) = std::env::var("CO_CHART_STORE") {
            self.charts.store = store.to_lowercase();
        }
        if let Ok(dir) = std::env::var("CO_CHART_DIR") {
            self.charts.dir = Some(PathBuf::from(dir));
        }
        if let Some(cap) = std::env::var("CO_CHART_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            self.charts.capacity = cap;
        }
        if let Ok(path) = std::env::var("CO_PATTERNS_PATH") {
            self.patterns.path = Some(PathBuf::from(path));
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.generation.timeout_ms == 0 {
            anyhow::bail!("generation.timeout_ms must be > 0");
        }
        if self.runtime.tool_timeout_ms == 0 {
            anyhow::bail!("CO_TOOL_TIMEOUT_MS must be > 0");
        }
        if self.charts.capacity == 0 {
            anyhow::bail!("charts.capacity must be > 0");
        }
        if !matches!(self.charts.store.as_str(), "memory" | "file") {
            anyhow::bail!(
                "charts.store must be 'memory' or 'file', got '{}'",
                self.charts.store
            );
        }
        Ok(())
    }

    /// Directory for the file chart store
    pub fn chart_dir(&self) -> PathBuf {
        self.charts.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("creative-orientation")
                .join("charts")
        })
    }

    /// Pattern tables: the configured file, or the bundled defaults
    pub fn load_patterns(&self) -> crate::error::Result<PatternDictionary> {
        match &self.patterns.path {
            Some(path) => PatternDictionary::from_path(path),
            None => Ok(PatternDictionary::builtin().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.generation.enabled);
        assert_eq!(config.charts.store, "memory");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [generation]
            model = "gemini-2.5-pro"

            [charts]
            store = "file"
            dir = "/tmp/charts"
            "#,
        )
        .unwrap();
        assert_eq!(config.generation.model, "gemini-2.5-pro");
        assert_eq!(config.generation.timeout_ms, 120_000);
        assert_eq!(config.charts.capacity, 256);
        assert_eq!(config.chart_dir(), PathBuf::from("/tmp/charts"));
    }

    #[test]
    fn unknown_store_is_rejected() {
        let mut config = Config::default();
        config.charts.store = "surreal".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn bundled_patterns_load_without_path() {
        let dict = Config::default().load_patterns().unwrap();
        assert_eq!(dict.version(), "1");
    }
}
