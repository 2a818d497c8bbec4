//! Goal decomposition pipeline.
//!
//! ## Flow
//! 1. Validate the request (non-empty goal, `1..=max` days) without touching the network
//! 2. Resolve a client from the provider (missing key fails here)
//! 3. Send the prompt; decode the reply (fence strip, strict parse, bracket fallback)
//! 4. Validate against the single accepted shape and the exact count
//! 5. On any failure, try again with the next temperature, up to `max_attempts`

pub mod decode;
mod error;
mod generator;
pub mod prompt;
mod types;

pub use error::GenerationError;
pub use generator::{GenerationSettings, TaskGenerator};
pub use types::{GeneratedTask, GeneratedTasks, GenerationRequest};
