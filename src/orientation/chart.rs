//! Tension chart validation and construction.
//!
//! Rules run in a fixed order and the first violation is returned:
//! outcome wording, reality wording, due-date parse, due-date futurity.

use super::types::{TensionChart, non_empty};
use crate::error::{CreativeOrientationError, Result};
use crate::patterns::matcher::find_terms;
use crate::patterns::{PatternCategory, PatternDictionary};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartRequest {
    pub desired_outcome: String,
    pub current_reality: String,
    pub due_date: String,
    pub action_steps: Vec<String>,
}

impl ChartRequest {
    /// Presence checks that come before the wording rules.
    pub fn check_required(&self) -> Result<()> {
        if self.desired_outcome.trim().is_empty() {
            return Err(CreativeOrientationError::missing_field(
                "desiredOutcome",
                "a desired outcome is required",
            ));
        }
        if self.current_reality.trim().is_empty() {
            return Err(CreativeOrientationError::missing_field(
                "currentReality",
                "a current reality is required",
            ));
        }
        if self.due_date.trim().is_empty() {
            return Err(CreativeOrientationError::missing_field(
                "dueDate",
                "a due date is required",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ChartViolation {
    ProblemOutcome { detected: Vec<String> },
    FutureReality { detected: Vec<String> },
    UnparsableDueDate { input: String },
    PastDueDate { due: DateTime<Utc> },
}

impl ChartViolation {
    /// Request field the violation is about.
    pub fn field(&self) -> &'static str {
        match self {
            ChartViolation::ProblemOutcome { .. } => "desiredOutcome",
            ChartViolation::FutureReality { .. } => "currentReality",
            ChartViolation::UnparsableDueDate { .. } | ChartViolation::PastDueDate { .. } => {
                "dueDate"
            }
        }
    }

    pub fn guidance(&self) -> String {
        match self {
            ChartViolation::ProblemOutcome { detected } => format!(
                "Desired outcome uses problem-solving language ({}). Structural tension \
                 charts hold what you want to create, not what you want to get rid of. \
                 Reframe it as the result you want to bring into being, e.g. \
                 \"A calm, organized workspace where focused work happens\".",
                detected.join(", ")
            ),
            ChartViolation::FutureReality { detected } => format!(
                "Current reality contains future or obligation language ({}). Describe \
                 where things stand right now, objectively, without plans or judgments, \
                 e.g. \"I have two drafts finished and no publisher yet\".",
                detected.join(", ")
            ),
            ChartViolation::UnparsableDueDate { input } => format!(
                "Due date '{}' could not be read. Use a calendar date such as \
                 \"2026-12-31\", \"2026-12-31T17:00:00Z\", or \"December 31, 2026\".",
                input
            ),
            ChartViolation::PastDueDate { due } => format!(
                "Due date {} is in the past. The due date must be in the future.",
                due.format("%Y-%m-%d")
            ),
        }
    }
}

/// Accepts RFC 3339, a bare calendar date (midnight UTC), or a naive
/// date-time read as UTC.
pub fn parse_due_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(dt.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(input, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

/// Run the rules in order and return the parsed due date on success.
pub fn validate(
    request: &ChartRequest,
    now: DateTime<Utc>,
    dict: &PatternDictionary,
) -> std::result::Result<DateTime<Utc>, ChartViolation> {
    let detected = find_terms(
        &request.desired_outcome,
        dict.terms(PatternCategory::ChartOutcomeProblem),
    );
    if !detected.is_empty() {
        return Err(ChartViolation::ProblemOutcome { detected });
    }

    let detected = find_terms(
        &request.current_reality,
        dict.terms(PatternCategory::ChartRealityFuture),
    );
    if !detected.is_empty() {
        return Err(ChartViolation::FutureReality { detected });
    }

    let due = parse_due_date(&request.due_date).ok_or_else(|| ChartViolation::UnparsableDueDate {
        input: request.due_date.clone(),
    })?;
    if due < now {
        return Err(ChartViolation::PastDueDate { due });
    }
    Ok(due)
}

pub fn new_chart_id() -> String {
    format!("chart_{}", uuid::Uuid::new_v4().simple())
}

/// Validate and, when every rule passes, author the initial chart.
pub fn build_chart(
    request: &ChartRequest,
    now: DateTime<Utc>,
    dict: &PatternDictionary,
) -> std::result::Result<TensionChart, ChartViolation> {
    let due_date = validate(request, now, dict)?;
    let action_steps = request
        .action_steps
        .iter()
        .filter_map(|s| non_empty(Some(s.as_str())).map(str::to_string))
        .collect();

    Ok(TensionChart {
        id: new_chart_id(),
        desired_outcome: request.desired_outcome.trim().to_string(),
        current_reality: request.current_reality.trim().to_string(),
        due_date,
        action_steps,
        created_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn request() -> ChartRequest {
        ChartRequest {
            desired_outcome: "A published novel on bookstore shelves".into(),
            current_reality: "I have two drafts finished and no publisher".into(),
            due_date: "2026-12-31".into(),
            action_steps: vec!["Finish third draft".into(), "  ".into(), "Query agents".into()],
        }
    }

    #[test]
    fn valid_request_builds_chart() {
        let chart = build_chart(&request(), now(), PatternDictionary::builtin()).unwrap();
        assert!(chart.id.starts_with("chart_"));
        assert_eq!(chart.action_steps, vec!["Finish third draft", "Query agents"]);
        assert_eq!(chart.created_at, now());
        assert_eq!(chart.due_date, Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap());
    }

    #[test]
    fn outcome_rule_wins_over_reality_rule() {
        let mut req = request();
        req.desired_outcome = "Fix my writing habit".into();
        req.current_reality = "I should write more".into();
        let v = validate(&req, now(), PatternDictionary::builtin()).unwrap_err();
        assert_eq!(v, ChartViolation::ProblemOutcome { detected: vec!["fix".into()] });
        assert_eq!(v.field(), "desiredOutcome");
    }

    #[test]
    fn future_reality_is_rejected() {
        let mut req = request();
        req.current_reality = "I plan to write daily".into();
        let v = validate(&req, now(), PatternDictionary::builtin()).unwrap_err();
        assert_eq!(v.field(), "currentReality");
        assert!(v.guidance().contains("plan to"));
    }

    #[test]
    fn unparsable_date_gives_format_examples() {
        let mut req = request();
        req.due_date = "someday soon".into();
        let v = validate(&req, now(), PatternDictionary::builtin()).unwrap_err();
        assert!(matches!(v, ChartViolation::UnparsableDueDate { .. }));
        assert!(v.guidance().contains("2026-12-31"));
    }

    #[test]
    fn past_date_must_be_in_the_future() {
        let mut req = request();
        req.due_date = "2020-01-01".into();
        let v = validate(&req, now(), PatternDictionary::builtin()).unwrap_err();
        assert!(matches!(v, ChartViolation::PastDueDate { .. }));
        assert!(v.guidance().contains("must be in the future"));
    }

    #[test]
    fn date_parse_rules_are_not_reached_after_wording_violation() {
        let mut req = request();
        req.current_reality = "We will see".into();
        req.due_date = "garbage".into();
        let v = validate(&req, now(), PatternDictionary::builtin()).unwrap_err();
        assert!(matches!(v, ChartViolation::FutureReality { .. }));
    }

    #[test]
    fn accepted_date_formats() {
        for input in [
            "2026-12-31",
            "2026/12/31",
            "2026-12-31T17:00:00Z",
            "2026-12-31T17:00:00+02:00",
            "2026-12-31 17:00",
            "December 31, 2026",
        ] {
            assert!(parse_due_date(input).is_some(), "{input}");
        }
        assert!(parse_due_date("31/31/2026").is_none());
    }

    #[test]
    fn missing_fields_name_the_field() {
        let mut req = request();
        req.current_reality = " ".into();
        match req.check_required().unwrap_err() {
            CreativeOrientationError::Validation { field, .. } => assert_eq!(field, "currentReality"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
