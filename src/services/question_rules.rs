//! Checks shared by the creation and revision validators.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::models::domain::Level;
use crate::services::json_sanitizer::sanitize_llm_json;

pub const REQUIRED_KEYS: [&str; 4] = ["question", "answers", "explanation", "level"];

static MARKER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(✔|✅|\*|->|✓)").expect("MARKER_PREFIX is a valid regex pattern")
});

static CORRECT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*correct[:\-\s]").expect("CORRECT_PREFIX is a valid regex pattern")
});

static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[a-zA-Z]+").expect("HTML_TAG is a valid regex pattern"));

/// Answer text that gives away correctness (`✔ B`, `* B`, `Correct: B`, ...).
pub fn has_forbidden_marker(text: &str) -> bool {
    MARKER_PREFIX.is_match(text) || CORRECT_PREFIX.is_match(text)
}

pub fn contains_html_tag(text: &str) -> bool {
    HTML_TAG.is_match(text)
}

pub fn missing_keys(object: &Map<String, Value>) -> Vec<&'static str> {
    REQUIRED_KEYS
        .into_iter()
        .filter(|key| !object.contains_key(*key))
        .collect()
}

/// Trimmed content of a non-empty string value.
pub fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub fn parse_level(value: Option<&Value>) -> Result<Level, String> {
    value
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Level>().ok())
        .ok_or_else(|| "level must be one of Beginner, Intermediate, Advanced".to_string())
}

/// Explanation rules shared by both flows: present, non-empty, HTML.
pub fn check_explanation(value: Option<&Value>, errors: &mut Vec<String>) -> Option<String> {
    match non_empty_str(value) {
        None => {
            errors.push("explanation must be a non-empty string".to_string());
            None
        }
        Some(text) if !contains_html_tag(text) => {
            errors.push("explanation must contain HTML markup (e.g. <p>)".to_string());
            None
        }
        Some(text) => Some(text.to_string()),
    }
}

/// Text rules for `answers[index].text`.
pub fn check_answer_text(index: usize, value: Option<&Value>, errors: &mut Vec<String>) -> Option<String> {
    match non_empty_str(value) {
        None => {
            errors.push(format!("answers[{}].text must be a non-empty string", index));
            None
        }
        Some(text) if has_forbidden_marker(text) => {
            errors.push(format!(
                "answers[{}].text must not start with a correctness marker",
                index
            ));
            None
        }
        Some(text) => Some(text.to_string()),
    }
}

/// Pasted LLM output, sanitized and unwrapped to its list of items.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    pub items: Vec<Value>,
    pub sanitized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadError {
    pub message: String,
    pub sanitized: bool,
}

impl PayloadError {
    fn new(message: impl Into<String>, sanitized: bool) -> Self {
        PayloadError {
            message: message.into(),
            sanitized,
        }
    }
}

const SHAPE_ERROR: &str = "expected an object with a \"questions\" array or a top-level array";

/// Sanitizes and parses pasted text. Accepts `{"questions": [...]}` or a bare
/// array. A parse failure carries the parser's message.
pub fn parse_payload(raw: &str) -> Result<Payload, PayloadError> {
    let sanitized = sanitize_llm_json(raw);
    let value: Value = serde_json::from_str(&sanitized.text)
        .map_err(|err| PayloadError::new(err.to_string(), sanitized.changed))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("questions") {
            Some(Value::Array(items)) => items,
            _ => return Err(PayloadError::new(SHAPE_ERROR, sanitized.changed)),
        },
        _ => return Err(PayloadError::new(SHAPE_ERROR, sanitized.changed)),
    };

    Ok(Payload {
        items,
        sanitized: sanitized.changed,
    })
}
