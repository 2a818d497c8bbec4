//! API request and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::generation::{GeneratedTask, GenerationError, GenerationRequest};

/// Body of `POST /api/generate-tasks`.
///
/// Fields are kept loosely typed so that missing or mistyped values become an
/// `invalid_input` error instead of a generic deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTasksRequest {
    /// Free-text goal
    #[serde(default)]
    pub goal_description: Option<Value>,

    /// Number of days, and therefore tasks (integer or numeric string)
    #[serde(default)]
    pub duration_days: Option<Value>,
}

impl GenerateTasksRequest {
    pub fn into_generation_request(self) -> Result<GenerationRequest, GenerationError> {
        let goal_description = match self.goal_description {
            Some(Value::String(s)) if !s.trim().is_empty() => s,
            Some(Value::String(_)) | Some(Value::Null) | None => {
                return Err(GenerationError::InvalidInput(
                    "goalDescription is required".to_string(),
                ))
            }
            Some(_) => {
                return Err(GenerationError::InvalidInput(
                    "goalDescription must be a string".to_string(),
                ))
            }
        };
        let duration_days = parse_duration(self.duration_days.as_ref())?;
        Ok(GenerationRequest::new(goal_description, duration_days))
    }
}

fn parse_duration(value: Option<&Value>) -> Result<u32, GenerationError> {
    let invalid = |msg: &str| GenerationError::InvalidInput(format!("durationDays {}", msg));

    let days: i64 = match value {
        None | Some(Value::Null) => return Err(invalid("is required")),
        Some(Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i,
            (None, Some(f)) if f.fract() == 0.0 && f >= 1.0 => f as i64,
            (None, Some(f)) if f < 1.0 => return Err(invalid("must be at least 1")),
            _ => return Err(invalid("must be a whole number")),
        },
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| invalid("must be a number"))?,
        Some(_) => return Err(invalid("must be a number")),
    };

    if days < 1 {
        return Err(invalid("must be at least 1"));
    }
    // Out-of-range values saturate and are rejected by the configured maximum.
    Ok(u32::try_from(days).unwrap_or(u32::MAX))
}

/// Successful generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTasksResponse {
    pub tasks: Vec<GeneratedTask>,
}

/// Failure payload for every non-success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,

    /// Machine-readable classification (`invalid_input`, `retries_exhausted`, ...)
    pub kind: String,

    /// Upstream text or raw model output, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&GenerationError> for ErrorResponse {
    fn from(err: &GenerationError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind().to_string(),
            details: err.details(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Model used for generation
    pub model: String,

    /// Attempts per generation request
    pub max_attempts: u32,
}
