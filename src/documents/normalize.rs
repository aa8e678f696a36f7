//! Turns the model's reply text into a [`SummaryResult`].
//!
//! Two pure steps: [`strip_fence`] removes an optional markdown fence, then
//! [`parse_and_validate`] parses the JSON and enforces the summary shape.
//! No attempt is made to dig a JSON object out of surrounding prose.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::SummaryResult;

/// Minimum entries in `keyPoints` and `improvements`
pub const MIN_LIST_ENTRIES: usize = 3;

const SUMMARY_FIELDS: [&str; 5] = ["short", "medium", "long", "keyPoints", "improvements"];

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)\r?\n?```").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("reply is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("reply is not a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` is empty")]
    EmptyField(&'static str),

    #[error("field `{0}` has the wrong type")]
    WrongType(&'static str),

    #[error("field `{field}` has {found} entries, need at least {min}")]
    TooFewEntries {
        field: &'static str,
        found: usize,
        min: usize,
    },
}

/// Trim the reply and unwrap the first fenced block, if there is one
pub fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match FENCED_BLOCK.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str().trim(),
        None => trimmed,
    }
}

/// Parse a reply body and check it has every summary field.
///
/// Fields beyond the summary shape are kept in `extra` so the object goes
/// back to the caller unmodified.
pub fn parse_and_validate(text: &str) -> Result<SummaryResult, ValidationFailure> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ValidationFailure::InvalidJson(e.to_string()))?;
    let object = value.as_object().ok_or(ValidationFailure::NotAnObject)?;

    Ok(SummaryResult {
        short: required_text(object, "short")?,
        medium: required_text(object, "medium")?,
        long: required_text(object, "long")?,
        key_points: required_list(object, "keyPoints")?,
        improvements: required_list(object, "improvements")?,
        extra: object
            .iter()
            .filter(|(key, _)| !SUMMARY_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    })
}

/// Both steps in sequence
pub fn normalize_reply(text: &str) -> Result<SummaryResult, ValidationFailure> {
    parse_and_validate(strip_fence(text))
}

fn required_text(object: &Map<String, Value>, field: &'static str) -> Result<String, ValidationFailure> {
    match object.get(field) {
        None | Some(Value::Null) => Err(ValidationFailure::MissingField(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ValidationFailure::EmptyField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ValidationFailure::WrongType(field)),
    }
}

fn required_list(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, ValidationFailure> {
    let items = match object.get(field) {
        None | Some(Value::Null) => return Err(ValidationFailure::MissingField(field)),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ValidationFailure::WrongType(field)),
    };

    if items.len() < MIN_LIST_ENTRIES {
        return Err(ValidationFailure::TooFewEntries {
            field,
            found: items.len(),
            min: MIN_LIST_ENTRIES,
        });
    }

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            _ => Err(ValidationFailure::WrongType(field)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "short": "A certificate of completion.",
        "medium": "Issued to Jane Doe on 01/02/2024 by ACME Training.",
        "long": "The certificate, number CERT-00042, confirms completion.",
        "keyPoints": ["Jane Doe", "01/02/2024", "CERT-00042"],
        "improvements": ["Add a signature", "Include expiry date", "Higher resolution scan"]
    }"#;

    #[test]
    fn test_strip_fence_with_language_tag() {
        let fenced = format!("```json\n{}\n```", VALID);
        assert_eq!(strip_fence(&fenced), VALID.trim());
    }

    #[test]
    fn test_strip_fence_without_language_tag() {
        let fenced = format!("  ```\n{}\n```  \n", VALID);
        assert_eq!(strip_fence(&fenced), VALID.trim());
    }

    #[test]
    fn test_strip_fence_leaves_plain_text() {
        assert_eq!(strip_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_fenced_and_plain_parse_identically() {
        let fenced = format!("```json\n{}\n```", VALID);
        let from_fenced = normalize_reply(&fenced).unwrap();
        let from_plain = normalize_reply(VALID).unwrap();
        assert_eq!(from_fenced, from_plain);
        assert_eq!(from_plain.key_points.len(), 3);
    }

    #[test]
    fn test_prose_before_json_is_rejected() {
        let reply = "Sure! {\"short\":\"...\"}";
        assert!(matches!(
            normalize_reply(reply),
            Err(ValidationFailure::InvalidJson(_))
        ));
    }

    #[test]
    fn test_missing_improvements_rejected() {
        let mut value: Value = serde_json::from_str(VALID).unwrap();
        value.as_object_mut().unwrap().remove("improvements");
        let err = parse_and_validate(&value.to_string()).unwrap_err();
        assert_eq!(err, ValidationFailure::MissingField("improvements"));
    }

    #[test]
    fn test_too_few_improvements_rejected() {
        let mut value: Value = serde_json::from_str(VALID).unwrap();
        value["improvements"] = serde_json::json!(["one", "two"]);
        let err = parse_and_validate(&value.to_string()).unwrap_err();
        assert_eq!(
            err,
            ValidationFailure::TooFewEntries {
                field: "improvements",
                found: 2,
                min: 3
            }
        );
    }

    #[test]
    fn test_key_points_must_be_a_list() {
        let mut value: Value = serde_json::from_str(VALID).unwrap();
        value["keyPoints"] = serde_json::json!("Jane Doe, 01/02/2024, CERT-00042");
        let err = parse_and_validate(&value.to_string()).unwrap_err();
        assert_eq!(err, ValidationFailure::WrongType("keyPoints"));
    }

    #[test]
    fn test_empty_summary_rejected() {
        let mut value: Value = serde_json::from_str(VALID).unwrap();
        value["medium"] = serde_json::json!("");
        let err = parse_and_validate(&value.to_string()).unwrap_err();
        assert_eq!(err, ValidationFailure::EmptyField("medium"));
    }

    #[test]
    fn test_extra_fields_survive_round_trip() {
        let mut value: Value = serde_json::from_str(VALID).unwrap();
        value["documentType"] = serde_json::json!("certificate");
        value["confidence"] = serde_json::json!({"ocr": 0.97});

        let summary = parse_and_validate(&value.to_string()).unwrap();
        assert_eq!(summary.extra.len(), 2);
        assert_eq!(summary.extra["documentType"], "certificate");
        assert_eq!(serde_json::to_value(&summary).unwrap(), value);
    }

    #[test]
    fn test_array_reply_rejected() {
        assert_eq!(parse_and_validate("[1, 2, 3]"), Err(ValidationFailure::NotAnObject));
    }
}
