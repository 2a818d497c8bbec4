//! Decoding and schema validation of model output.
//!
//! Decoding runs in stages: strip code fences and parse strictly; if that
//! fails, parse the first complete list of objects embedded in the raw text,
//! ignoring whatever prose follows it; otherwise the output is malformed.
//! Validation then checks the parsed value against the one accepted shape:
//! an array of `{description, instructions}` objects.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::error::GenerationError;
use super::types::GeneratedTask;

/// Where a list of objects may begin: `[` followed by `{`.
fn object_list_start() -> &'static Regex {
    static LIST_START: OnceLock<Regex> = OnceLock::new();
    LIST_START.get_or_init(|| Regex::new(r"\[\s*\{").expect("static regex"))
}

/// Remove an enclosing ``` / ```json fence, if present.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Skip the info string (`json`, `JSON`, ...).
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };

    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Turn raw model text into JSON.
pub fn decode_payload(raw: &str) -> Result<Value, GenerationError> {
    let strict_err = match serde_json::from_str::<Value>(strip_code_fences(raw)) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let Some(value) = extract_bracketed(raw) {
        tracing::debug!("Recovered JSON array from surrounding text");
        return Ok(value);
    }

    Err(GenerationError::MalformedOutput {
        reason: format!("{}; no parseable bracketed list found", strict_err),
        raw: raw.to_string(),
    })
}

/// First candidate start whose text parses as one complete JSON value.
/// Trailing text after that value is ignored, brackets included.
fn extract_bracketed(raw: &str) -> Option<Value> {
    object_list_start().find_iter(raw).find_map(|start| {
        serde_json::Deserializer::from_str(&raw[start.start()..])
            .into_iter::<Value>()
            .next()?
            .ok()
    })
}

/// The single accepted element shape.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TaskShape {
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    instructions: Option<Value>,
}

/// Check the decoded payload and normalize it into exactly `expected` tasks.
pub fn validate_tasks(payload: Value, expected: u32) -> Result<Vec<GeneratedTask>, GenerationError> {
    let items = match payload {
        Value::Array(items) => items,
        other => {
            return Err(GenerationError::ShapeMismatch(format!(
                "expected a JSON array, got {}",
                value_kind(&other)
            )))
        }
    };

    let mut tasks = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let number = index + 1;
        if !item.is_object() {
            return Err(GenerationError::ShapeMismatch(format!(
                "task {} is {}, expected an object",
                number,
                value_kind(&item)
            )));
        }

        let shape: TaskShape = serde_json::from_value(item)
            .map_err(|e| GenerationError::ShapeMismatch(format!("task {}: {}", number, e)))?;

        let description = shape.description.as_ref().and_then(plain_text).ok_or_else(|| {
            GenerationError::ShapeMismatch(format!("task {} is missing a description", number))
        })?;
        let instructions = shape.instructions.as_ref().and_then(plain_text).ok_or_else(|| {
            GenerationError::ShapeMismatch(format!("task {} is missing instructions", number))
        })?;

        tasks.push(GeneratedTask {
            description,
            instructions,
        });
    }

    if tasks.len() != expected as usize {
        return Err(GenerationError::CountMismatch {
            expected,
            actual: tasks.len(),
        });
    }

    Ok(tasks)
}

/// Trimmed text for scalars; `None` for empty strings, null and containers.
fn plain_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
