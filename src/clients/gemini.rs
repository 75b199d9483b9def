//! Gemini CLI generation engine.
//!
//! Spawns `gemini` with stream-json output, collects assistant text, and kills
//! the child after a period with no output. A quota failure on the requested
//! model is retried once on the configured fallback model.

use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::Mutex;

use crate::clients::traits::{AgentError, GenerationEngine};
use crate::config::GenerationConfig;

const STDERR_CAP_BYTES: usize = 10 * 1024;
const DEFAULT_TIMEOUT_MS: u64 = 120_000; // inactivity threshold
const DEFAULT_MODEL: &str = "auto";
const DEFAULT_FALLBACK_MODEL: &str = "gemini-2.5-flash";
const ACTIVITY_CHECK_INTERVAL_MS: u64 = 1000;

static QUOTA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(quota|resource[_ ]exhausted|\b429\b|rate limit)").expect("quota regex")
});

static ANSI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("ansi regex"));

/// Streaming JSON event types from Gemini CLI
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeminiStreamEvent {
    Init {
        session_id: String,
        model: String,
    },
    Content {
        text: String,
    },
    Message {
        role: String,
        content: String,
        #[serde(default)]
        delta: bool,
    },
    Result {
        status: String,
    },
    Error {
        message: String,
    },
    #[serde(other)]
    Other,
}

/// Line-buffered parser for the CLI's stream-json output
#[derive(Default)]
pub struct StreamJsonParser {
    buffer: String,
}

impl StreamJsonParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_chunk(&mut self, chunk: &str) -> Vec<GeminiStreamEvent> {
        self.buffer.push_str(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.buffer.find('\n') {
            let line = self.buffer.drain(..=pos).collect::<String>();
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let line = line.strip_prefix("data:").map(str::trim).unwrap_or(line);
            match serde_json::from_str::<GeminiStreamEvent>(line) {
                Ok(event) => events.push(event),
                Err(e) => tracing::debug!("Skipping unparsable stream line ({}): {}", e, line),
            }
        }

        events
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    response: String,
}

/// Tracks output from the child process to detect hangs
#[derive(Debug)]
struct ActivityTracker {
    last_activity: Mutex<Instant>,
    bytes_seen: AtomicUsize,
    inactivity_threshold: Duration,
    start_time: Instant,
}

impl ActivityTracker {
    fn new(inactivity_threshold: Duration) -> Self {
        let now = Instant::now();
        Self {
            last_activity: Mutex::new(now),
            bytes_seen: AtomicUsize::new(0),
            inactivity_threshold,
            start_time: now,
        }
    }

    async fn reset(&self, bytes: usize) {
        *self.last_activity.lock().await = Instant::now();
        self.bytes_seen.fetch_add(bytes, Ordering::Relaxed);
    }

    async fn is_inactive(&self) -> bool {
        self.last_activity.lock().await.elapsed() > self.inactivity_threshold
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    model: String,
    fallback_model: Option<String>,
    timeout: Duration,
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeminiClient {
    pub fn new() -> Self {
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout_ms = std::env::var("GEMINI_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let fallback = std::env::var("GEMINI_FALLBACK_MODEL")
            .unwrap_or_else(|_| DEFAULT_FALLBACK_MODEL.to_string());
        Self {
            model,
            fallback_model: Some(fallback).filter(|m| !m.is_empty()),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            model: config.model.clone(),
            fallback_model: config.fallback_model.clone().filter(|m| !m.is_empty()),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn run_once(&self, prompt: &str, model: &str) -> Result<String, AgentError> {
        let mut cmd = Command::new("gemini");
        cmd.kill_on_drop(true)
            .env("CI", "true")
            .env("TERM", "dumb")
            .env("NO_COLOR", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // "auto" lets the CLI route; omit -m
        if model != "auto" && !model.is_empty() {
            cmd.arg("-m").arg(model);
        }
        cmd.arg("--output-format").arg("stream-json").arg(prompt);
        let mut child = cmd.spawn().map_err(map_spawn_err)?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| AgentError::CliError("stdout unavailable".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| AgentError::CliError("stderr unavailable".to_string()))?;

        let tracker = ActivityTracker::new(self.timeout);
        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();
        let mut stdout_chunk = [0u8; 4096];
        let mut stderr_chunk = [0u8; 1024];
        let mut parser = StreamJsonParser::new();
        let mut content = String::new();
        let mut stdout_open = true;
        let mut stderr_open = true;

        loop {
            tokio::select! {
                result = stdout.read(&mut stdout_chunk), if stdout_open => {
                    match result {
                        Ok(0) => stdout_open = false,
                        Ok(n) => {
                            tracker.reset(n).await;
                            stdout_buf.extend_from_slice(&stdout_chunk[..n]);
                            let chunk = String::from_utf8_lossy(&stdout_chunk[..n]);
                            for event in parser.parse_chunk(&chunk) {
                                collect_event(&event, &mut content);
                            }
                        }
                        Err(e) => {
                            return Err(AgentError::CliError(format!("stdout read error: {}", e)));
                        }
                    }
                }

                result = stderr.read(&mut stderr_chunk), if stderr_open => {
                    match result {
                        Ok(0) => stderr_open = false,
                        Ok(n) => {
                            tracker.reset(n).await;
                            let remaining = STDERR_CAP_BYTES.saturating_sub(stderr_buf.len());
                            stderr_buf.extend_from_slice(&stderr_chunk[..remaining.min(n)]);
                        }
                        Err(e) => tracing::warn!("stderr read error (non-fatal): {}", e),
                    }
                }

                result = child.wait() => {
                    let status = result
                        .map_err(|e| AgentError::CliError(format!("wait error: {}", e)))?;
                    while let Ok(n) = stdout.read(&mut stdout_chunk).await {
                        if n == 0 {
                            break;
                        }
                        stdout_buf.extend_from_slice(&stdout_chunk[..n]);
                        let chunk = String::from_utf8_lossy(&stdout_chunk[..n]);
                        for event in parser.parse_chunk(&chunk) {
                            collect_event(&event, &mut content);
                        }
                    }
                    while let Ok(n) = stderr.read(&mut stderr_chunk).await {
                        if n == 0 {
                            break;
                        }
                        let remaining = STDERR_CAP_BYTES.saturating_sub(stderr_buf.len());
                        stderr_buf.extend_from_slice(&stderr_chunk[..remaining.min(n)]);
                    }

                    if !status.success() {
                        let stderr_str = String::from_utf8_lossy(&stderr_buf).trim().to_string();
                        if is_quota_error(&stderr_str) {
                            return Err(AgentError::QuotaExhausted {
                                model: model.to_string(),
                                detail: truncate_chars(&stderr_str, 300),
                            });
                        }
                        return Err(AgentError::CliError(format!(
                            "gemini exit {}: {}",
                            status, stderr_str
                        )));
                    }
                    break;
                }

                _ = tokio::time::sleep(Duration::from_millis(ACTIVITY_CHECK_INTERVAL_MS)) => {
                    if tracker.is_inactive().await {
                        tracing::warn!(
                            "Gemini inactive: {} bytes seen, {}s runtime",
                            tracker.bytes_seen.load(Ordering::Relaxed),
                            tracker.start_time.elapsed().as_secs()
                        );
                        let _ = child.kill().await;
                        return Err(AgentError::Timeout {
                            timeout_ms: self.timeout.as_millis() as u64,
                        });
                    }
                }
            }
        }

        let text = if content.trim().is_empty() {
            parse_gemini_response(&String::from_utf8_lossy(&stdout_buf))?.response
        } else {
            content
        };
        let cleaned = strip_ansi_codes(&text).trim().to_string();
        if cleaned.is_empty() {
            return Err(AgentError::CliError(format!(
                "empty Gemini response; stderr: {}",
                truncate_chars(String::from_utf8_lossy(&stderr_buf).trim(), 200)
            )));
        }

        tracing::debug!(
            "Gemini call completed: model={}, {} bytes, {}s",
            model,
            tracker.bytes_seen.load(Ordering::Relaxed),
            tracker.start_time.elapsed().as_secs()
        );
        Ok(cleaned)
    }
}

#[async_trait]
impl GenerationEngine for GeminiClient {
    async fn generate(&self, prompt: &str, model_hint: Option<&str>) -> Result<String, AgentError> {
        let model = model_hint
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.model);

        match self.run_once(prompt, model).await {
            Err(AgentError::QuotaExhausted { model: exhausted, detail }) => {
                match self.fallback_model.as_deref().filter(|f| *f != exhausted) {
                    Some(fallback) => {
                        tracing::warn!(
                            "Quota exhausted on {}, retrying once on {}",
                            exhausted,
                            fallback
                        );
                        self.run_once(prompt, fallback).await
                    }
                    None => Err(AgentError::QuotaExhausted {
                        model: exhausted,
                        detail,
                    }),
                }
            }
            other => other,
        }
    }
}

fn collect_event(event: &GeminiStreamEvent, content: &mut String) {
    match event {
        GeminiStreamEvent::Init { session_id, model } => {
            tracing::debug!("Gemini session {} on {}", session_id, model)
        }
        GeminiStreamEvent::Content { text } => content.push_str(text),
        // Only assistant messages carry the answer
        GeminiStreamEvent::Message {
            role,
            content: text,
            delta,
        } if role == "assistant" => {
            if *delta {
                content.push_str(text);
            } else {
                *content = text.clone();
            }
        }
        GeminiStreamEvent::Result { status } => tracing::debug!("Gemini result status: {}", status),
        GeminiStreamEvent::Error { message } => tracing::error!("Gemini stream error: {}", message),
        _ => {}
    }
}

fn is_quota_error(stderr: &str) -> bool {
    QUOTA_RE.is_match(stderr)
}

fn map_spawn_err(err: std::io::Error) -> AgentError {
    if err.kind() == std::io::ErrorKind::NotFound {
        AgentError::NotFound
    } else {
        AgentError::CliError(err.to_string())
    }
}

fn parse_gemini_response(output: &str) -> Result<GeminiResponse, AgentError> {
    let cleaned = strip_ansi_codes(output);
    if let Ok(resp) = serde_json::from_str::<GeminiResponse>(&cleaned) {
        return Ok(resp);
    }

    for candidate in extract_json_candidates(&cleaned).iter().rev() {
        if let Ok(resp) = serde_json::from_str::<GeminiResponse>(candidate) {
            return Ok(resp);
        }
    }

    Err(AgentError::ParseError(format!(
        "no valid JSON object found in Gemini output: {}",
        truncate_chars(cleaned.trim(), 500)
    )))
}

fn extract_json_candidates(text: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    let mut depth: u32 = 0;
    let mut start: Option<usize> = None;
    let mut in_string = false;
    let mut escape = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(idx);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0
                    && let Some(s) = start.take()
                {
                    candidates.push(text[s..=idx].to_string());
                }
            }
            _ => {}
        }
    }

    candidates
}

fn strip_ansi_codes(input: &str) -> String {
    ANSI_RE.replace_all(input, "").to_string()
}

fn truncate_chars(input: &str, max: usize) -> String {
    let mut out: String = input.chars().take(max).collect();
    if input.chars().count() > max {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_collects_assistant_deltas() {
        let mut parser = StreamJsonParser::new();
        let chunk = r#"{"type":"init","session_id":"s1","model":"gemini-pro"}
{"type":"message","role":"user","content":"ignored"}
{"type":"message","role":"assistant","content":"Hello, ","delta":true}
{"type":"message","role":"assistant","content":"creator","delta":true}
{"type":"result","status":"success"}
"#;
        let mut content = String::new();
        for event in parser.parse_chunk(chunk) {
            collect_event(&event, &mut content);
        }
        assert_eq!(content, "Hello, creator");
    }

    #[test]
    fn parser_buffers_partial_lines() {
        let mut parser = StreamJsonParser::new();
        assert!(parser.parse_chunk(r#"{"type":"content","#).is_empty());
        let events = parser.parse_chunk("\"text\":\"Valid\"}\n");
        assert_eq!(
            events,
            vec![GeminiStreamEvent::Content {
                text: "Valid".into()
            }]
        );
    }

    #[test]
    fn parser_strips_data_prefix_and_skips_garbage() {
        let mut parser = StreamJsonParser::new();
        let chunk = "not json\ndata: {\"type\":\"content\",\"text\":\"ok\"}\n{\"type\":\"tool_use\"}\n";
        let events = parser.parse_chunk(chunk);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], GeminiStreamEvent::Other);
    }

    #[test]
    fn quota_detection() {
        assert!(is_quota_error("Error: RESOURCE_EXHAUSTED: Quota exceeded"));
        assert!(is_quota_error("HTTP 429 Too Many Requests"));
        assert!(!is_quota_error("unknown flag --foo"));
    }

    #[test]
    fn final_json_fallback_is_parsed() {
        let out = "\x1b[32mlog line\x1b[0m\n{\"session_id\":\"x\",\"response\":\"Done {ok}\"}";
        let resp = parse_gemini_response(out).unwrap();
        assert_eq!(resp.response, "Done {ok}");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé...");
        assert_eq!(truncate_chars("hi", 5), "hi");
    }
}
