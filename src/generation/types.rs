//! Request and result types for task generation.

use serde::{Deserialize, Serialize};

use super::error::GenerationError;

/// A goal to break down into `duration_days` daily tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub goal_description: String,
    pub duration_days: u32,
}

impl GenerationRequest {
    pub fn new(goal_description: impl Into<String>, duration_days: u32) -> Self {
        Self {
            goal_description: goal_description.into(),
            duration_days,
        }
    }

    /// Check the request before anything is sent to the model.
    pub fn validate(&self, max_duration_days: u32) -> Result<(), GenerationError> {
        if self.goal_description.trim().is_empty() {
            return Err(GenerationError::InvalidInput(
                "goalDescription must not be empty".to_string(),
            ));
        }
        if self.duration_days < 1 {
            return Err(GenerationError::InvalidInput(
                "durationDays must be at least 1".to_string(),
            ));
        }
        if self.duration_days > max_duration_days {
            return Err(GenerationError::InvalidInput(format!(
                "durationDays must be at most {}",
                max_duration_days
            )));
        }
        Ok(())
    }
}

/// One day's task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTask {
    /// Short task title
    pub description: String,
    /// Actionable steps
    pub instructions: String,
}

/// A validated task list and how it was obtained.
#[derive(Debug, Clone)]
pub struct GeneratedTasks {
    /// Exactly `duration_days` tasks, in order
    pub tasks: Vec<GeneratedTask>,
    /// Attempts used, including the successful one
    pub attempts: u32,
    /// Model reported by the backend
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_normal_request() {
        let req = GenerationRequest::new("Learn basic guitar", 5);
        assert!(req.validate(365).is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_goal() {
        let req = GenerationRequest::new("   \n", 5);
        let err = req.validate(365).unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }

    #[test]
    fn test_validate_duration_bounds() {
        assert!(GenerationRequest::new("Run a 5k", 0).validate(365).is_err());
        assert!(GenerationRequest::new("Run a 5k", 30).validate(30).is_ok());
        assert!(GenerationRequest::new("Run a 5k", 31).validate(30).is_err());
    }
}
