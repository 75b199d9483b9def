//! Custom deserializers for flexible parameter parsing.
//!
//! MCP clients are loose about JSON types; these accept the common variants
//! while keeping the request structs strongly typed.

use serde::{Deserialize, Deserializer};

/// Deserializes a boolean that may arrive as `true`, `"true"`, `"yes"`, `1`, or `"1"`.
/// Null or absent falls back to the field's serde default.
///
/// ```json
/// { "autoCorrect": true }
/// { "autoCorrect": "false" }
/// { "saveToMemory": 0 }
/// ```
pub fn de_forgiving_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(v) = opt else { return Ok(None) };
    match v {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Bool(b) => Ok(Some(b)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            _ => Err(D::Error::custom(format!("invalid numeric boolean: {}", n))),
        },
        serde_json::Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" | "" => Ok(Some(false)),
            other => Err(D::Error::custom(format!("invalid boolean string: {}", other))),
        },
        other => Err(D::Error::custom(format!(
            "invalid type for boolean: {}",
            other
        ))),
    }
}

/// Deserializes action steps given as an array of strings, a single string,
/// or a newline-separated block. Non-string array items are stringified.
pub fn de_action_steps<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(v) = opt else { return Ok(Vec::new()) };
    match v {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::String(s) => Ok(s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()),
        serde_json::Value::Array(arr) => Ok(arr
            .into_iter()
            .map(|el| match el {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect()),
        other => Err(D::Error::custom(format!(
            "invalid type for actionSteps: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "de_forgiving_bool")]
        flag: Option<bool>,
        #[serde(default, deserialize_with = "de_action_steps")]
        steps: Vec<String>,
    }

    #[test]
    fn booleans_from_strings_and_numbers() {
        let p: Probe = serde_json::from_value(json!({"flag": "Yes"})).unwrap();
        assert_eq!(p.flag, Some(true));
        let p: Probe = serde_json::from_value(json!({"flag": 0})).unwrap();
        assert_eq!(p.flag, Some(false));
        let p: Probe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.flag, None);
        assert!(serde_json::from_value::<Probe>(json!({"flag": "maybe"})).is_err());
    }

    #[test]
    fn action_steps_accept_string_or_array() {
        let p: Probe = serde_json::from_value(json!({"steps": "one\n\n two "})).unwrap();
        assert_eq!(p.steps, vec!["one", "two"]);
        let p: Probe = serde_json::from_value(json!({"steps": ["a", 2]})).unwrap();
        assert_eq!(p.steps, vec!["a", "2"]);
        let p: Probe = serde_json::from_value(json!({"steps": null})).unwrap();
        assert!(p.steps.is_empty());
        assert!(serde_json::from_value::<Probe>(json!({"steps": {"x": 1}})).is_err());
    }
}
