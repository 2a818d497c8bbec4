//! The task generator: prompt, call, validate, retry.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::{Config, DEFAULT_MODEL, DEFAULT_TEMPERATURES};
use crate::llm::{ChatMessage, ChatOptions, LlmClient, LlmProvider};

use super::decode;
use super::error::GenerationError;
use super::prompt;
use super::types::{GeneratedTask, GeneratedTasks, GenerationRequest};

/// Tunables for a [`TaskGenerator`].
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    /// Total attempts per request (at least one is always made)
    pub max_attempts: u32,
    /// Temperature per attempt; the last entry repeats for later attempts
    pub temperatures: Vec<f64>,
    pub minutes_per_task: u32,
    pub max_tokens: Option<u64>,
    pub max_duration_days: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_attempts: 3,
            temperatures: DEFAULT_TEMPERATURES.to_vec(),
            minutes_per_task: 30,
            max_tokens: None,
            max_duration_days: 365,
        }
    }
}

impl GenerationSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            max_attempts: config.max_attempts,
            temperatures: config.temperatures.clone(),
            minutes_per_task: config.minutes_per_task,
            max_tokens: config.max_tokens,
            max_duration_days: config.max_duration_days,
        }
    }

    /// Temperature for the zero-based `attempt`, clamped to `0.0..=2.0`.
    pub fn temperature_for(&self, attempt: u32) -> f64 {
        let index = (attempt as usize).min(self.temperatures.len().saturating_sub(1));
        self.temperatures
            .get(index)
            .copied()
            .unwrap_or(DEFAULT_TEMPERATURES[0])
            .clamp(0.0, 2.0)
    }
}

/// Turns goals into validated daily task lists.
///
/// Holds no per-request state; one instance serves concurrent requests.
pub struct TaskGenerator {
    provider: Arc<dyn LlmProvider>,
    settings: GenerationSettings,
}

impl TaskGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Generate exactly `request.duration_days` tasks.
    ///
    /// Input and credentials are checked before any network call. Attempts run
    /// one after another; the first one passing validation wins. When every
    /// attempt fails the result is `RetriesExhausted` wrapping the last reason.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedTasks, GenerationError> {
        let request_id = Uuid::new_v4();
        request.validate(self.settings.max_duration_days)?;
        let client = self.provider.client()?;

        let expected = request.duration_days;
        let max_attempts = self.settings.max_attempts.max(1);
        let messages = prompt::build_messages(request, self.settings.minutes_per_task);

        info!(
            "[{}] Generating {} tasks with {} (up to {} attempts)",
            request_id, expected, self.settings.model, max_attempts
        );

        let mut last_error = None;
        for attempt in 0..max_attempts {
            let temperature = self.settings.temperature_for(attempt);
            match self
                .attempt(request_id, client.as_ref(), &messages, temperature, expected)
                .await
            {
                Ok((tasks, model)) => {
                    info!(
                        "[{}] Attempt {}/{} produced {} valid tasks",
                        request_id,
                        attempt + 1,
                        max_attempts,
                        tasks.len()
                    );
                    return Ok(GeneratedTasks {
                        tasks,
                        attempts: attempt + 1,
                        model,
                    });
                }
                Err(e) => {
                    warn!(
                        "[{}] Attempt {}/{} rejected (temperature {}): {}",
                        request_id,
                        attempt + 1,
                        max_attempts,
                        temperature,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        let last = last_error.unwrap_or_else(|| {
            GenerationError::ShapeMismatch("no attempt produced output".to_string())
        });
        error!(
            "[{}] Giving up after {} attempts: {}",
            request_id, max_attempts, last
        );
        Err(GenerationError::RetriesExhausted {
            expected,
            attempts: max_attempts,
            last: Box::new(last),
        })
    }

    async fn attempt(
        &self,
        request_id: Uuid,
        client: &dyn LlmClient,
        messages: &[ChatMessage],
        temperature: f64,
        expected: u32,
    ) -> Result<(Vec<GeneratedTask>, Option<String>), GenerationError> {
        let options = ChatOptions {
            temperature: Some(temperature),
            top_p: None,
            max_tokens: self.settings.max_tokens,
        };

        let response = client
            .chat_completion(&self.settings.model, messages, options)
            .await?;

        if let Some(usage) = &response.usage {
            debug!(
                "[{}] Token usage: {} prompt + {} completion = {}",
                request_id, usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }
        if response.finish_reason.as_deref() == Some("length") {
            warn!(
                "[{}] Completion hit the token limit (max_tokens {:?}); output is likely truncated",
                request_id, self.settings.max_tokens
            );
        }

        let content = response.content.unwrap_or_default();
        let payload = decode::decode_payload(&content)?;
        let tasks = decode::validate_tasks(payload, expected)?;
        Ok((tasks, response.model))
    }
}
