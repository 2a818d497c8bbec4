//! Configuration management for the task generation service.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `OPENAI_BASE_URL` - Optional. OpenAI-compatible API root. Defaults to `https://api.openai.com/v1`.
//! - `OPENAI_API_KEY_VAR` - Optional. Name of the variable holding the API key. Defaults to `OPENAI_API_KEY`.
//!   The key itself is read on every request, not here.
//! - `GENERATION_MODEL` - Optional. Model id. Defaults to `gpt-3.5-turbo`.
//! - `GENERATION_MAX_ATTEMPTS` - Optional. Attempts per request. Defaults to `3`.
//! - `GENERATION_TEMPERATURES` - Optional. Comma-separated per-attempt temperatures. Defaults to `0.7,0.4,0.9`.
//! - `GENERATION_MINUTES_PER_TASK` - Optional. Time budget per task stated in the prompt. Defaults to `30`.
//! - `GENERATION_MAX_TOKENS` - Optional. Completion token cap.
//! - `MAX_DURATION_DAYS` - Optional. Largest accepted `durationDays`. Defaults to `365`.
//! - `REQUEST_TIMEOUT_SECS` - Optional. Transport timeout for model calls. Defaults to `60`.

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const DEFAULT_TEMPERATURES: [f64; 3] = [0.7, 0.4, 0.9];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// OpenAI-compatible API root
    pub openai_base_url: String,

    /// Environment variable the API key is read from at request time
    pub api_key_var: String,

    /// Model identifier
    pub model: String,

    /// Attempts per generation request
    pub max_attempts: u32,

    /// Temperature per attempt; the last entry repeats
    pub temperatures: Vec<f64>,

    /// Time budget per task stated in the prompt, in minutes
    pub minutes_per_task: u32,

    /// Completion token cap sent upstream; `None` leaves it to the backend
    pub max_tokens: Option<u64>,

    /// Largest accepted duration
    pub max_duration_days: u32,

    /// Whole-request timeout for upstream calls, in seconds
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a numeric variable does not parse
    /// or falls outside its allowed range.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = parse_env("PORT", 3000u16)?;

        let openai_base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let api_key_var =
            std::env::var("OPENAI_API_KEY_VAR").unwrap_or_else(|_| DEFAULT_API_KEY_VAR.to_string());

        let model = std::env::var("GENERATION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let max_attempts = parse_env("GENERATION_MAX_ATTEMPTS", 3u32)?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "GENERATION_MAX_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let temperatures = match std::env::var("GENERATION_TEMPERATURES") {
            Ok(raw) => parse_temperatures(&raw).map_err(|e| {
                ConfigError::InvalidValue("GENERATION_TEMPERATURES".to_string(), e)
            })?,
            Err(_) => DEFAULT_TEMPERATURES.to_vec(),
        };

        let minutes_per_task = parse_env("GENERATION_MINUTES_PER_TASK", 30u32)?;

        let max_tokens = match std::env::var("GENERATION_MAX_TOKENS") {
            Ok(raw) => Some(raw.trim().parse().map_err(|e| {
                ConfigError::InvalidValue("GENERATION_MAX_TOKENS".to_string(), format!("{}", e))
            })?),
            Err(_) => None,
        };

        let max_duration_days = parse_env("MAX_DURATION_DAYS", 365u32)?;
        if max_duration_days == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_DURATION_DAYS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", 60u64)?;

        Ok(Self {
            host,
            port,
            openai_base_url,
            api_key_var,
            model,
            max_attempts,
            temperatures,
            minutes_per_task,
            max_tokens,
            max_duration_days,
            request_timeout_secs,
        })
    }

    /// Create a config with default values (useful for testing).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            api_key_var: DEFAULT_API_KEY_VAR.to_string(),
            model: model.into(),
            max_attempts: 3,
            temperatures: DEFAULT_TEMPERATURES.to_vec(),
            minutes_per_task: 30,
            max_tokens: None,
            max_duration_days: 365,
            request_timeout_secs: 60,
        }
    }
}

fn parse_env<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e))),
        Err(_) => Ok(default),
    }
}

/// Parse a comma-separated temperature schedule such as `0.7, 0.4, 0.9`.
pub fn parse_temperatures(raw: &str) -> Result<Vec<f64>, String> {
    let temps = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let t: f64 = s.parse().map_err(|e| format!("{:?}: {}", s, e))?;
            if !(0.0..=2.0).contains(&t) {
                return Err(format!("{} is outside 0.0..=2.0", t));
            }
            Ok(t)
        })
        .collect::<Result<Vec<_>, _>>()?;

    if temps.is_empty() {
        return Err("at least one temperature is required".to_string());
    }
    Ok(temps)
}
