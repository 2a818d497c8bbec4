//! Failure classification for task generation.

use thiserror::Error;

use crate::llm::{LlmError, LlmErrorKind};

/// Why a generation request (or a single attempt) failed.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Rejected before any network activity.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No credential or backend configuration; nothing was sent.
    #[error("model backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend answered with a non-success status or the call failed.
    #[error("model backend request failed: {message}")]
    UpstreamError {
        status: Option<u16>,
        message: String,
        /// Upstream response body or transport error text
        body: Option<String>,
    },

    /// The model's text held no parseable JSON, even after bracket extraction.
    #[error("model output could not be parsed: {reason}")]
    MalformedOutput { reason: String, raw: String },

    /// Parsed, but not a list of `{description, instructions}` objects.
    #[error("model output has the wrong shape: {0}")]
    ShapeMismatch(String),

    #[error("model returned {actual} tasks, expected exactly {expected}")]
    CountMismatch { expected: u32, actual: usize },

    #[error("could not generate exactly {expected} tasks after {attempts} attempts: {last}")]
    RetriesExhausted {
        expected: u32,
        attempts: u32,
        #[source]
        last: Box<GenerationError>,
    },
}

impl GenerationError {
    /// Stable machine-readable classification.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::InvalidInput(_) => "invalid_input",
            GenerationError::BackendUnavailable(_) => "backend_unavailable",
            GenerationError::UpstreamError { .. } => "upstream_error",
            GenerationError::MalformedOutput { .. } => "malformed_output",
            GenerationError::ShapeMismatch(_) => "shape_mismatch",
            GenerationError::CountMismatch { .. } => "count_mismatch",
            GenerationError::RetriesExhausted { .. } => "retries_exhausted",
        }
    }

    /// Diagnostic detail beyond the message, such as the raw model output.
    pub fn details(&self) -> Option<String> {
        match self {
            GenerationError::MalformedOutput { raw, .. } => Some(raw.clone()),
            GenerationError::UpstreamError { body, .. } => body.clone(),
            GenerationError::RetriesExhausted { last, .. } => last.details(),
            _ => None,
        }
    }

    /// The specific failure behind a `RetriesExhausted`, or `self`.
    pub fn root(&self) -> &GenerationError {
        match self {
            GenerationError::RetriesExhausted { last, .. } => last.root(),
            other => other,
        }
    }
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err.kind {
            LlmErrorKind::MissingCredential => GenerationError::BackendUnavailable(err.message),
            _ => {
                let message = err.to_string();
                let body = Some(err.message).filter(|b| !b.trim().is_empty());
                GenerationError::UpstreamError {
                    status: err.status_code,
                    message,
                    body,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_conversion() {
        let err: GenerationError = LlmError::from_status(503, "overloaded".to_string()).into();
        match &err {
            GenerationError::UpstreamError {
                status,
                message,
                body,
            } => {
                assert_eq!(*status, Some(503));
                assert!(message.contains("HTTP 503"));
                assert!(message.contains("overloaded"));
                assert_eq!(body.as_deref(), Some("overloaded"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(err.details().as_deref(), Some("overloaded"));

        let err: GenerationError = LlmError::from_status(502, String::new()).into();
        assert_eq!(err.details(), None);

        let err: GenerationError = LlmError::missing_credential("no key".to_string()).into();
        assert_eq!(err.kind(), "backend_unavailable");
    }

    #[test]
    fn test_exhausted_wraps_last_reason() {
        let err = GenerationError::RetriesExhausted {
            expected: 5,
            attempts: 3,
            last: Box::new(GenerationError::MalformedOutput {
                reason: "expected value at line 1 column 1".to_string(),
                raw: "Sure! Here are your tasks".to_string(),
            }),
        };

        assert_eq!(err.kind(), "retries_exhausted");
        assert!(err
            .to_string()
            .starts_with("could not generate exactly 5 tasks after 3 attempts"));
        assert_eq!(err.details().as_deref(), Some("Sure! Here are your tasks"));
        assert_eq!(err.root().kind(), "malformed_output");
    }
}
