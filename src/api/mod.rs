//! HTTP API for the task generation service.
//!
//! ## Endpoints
//!
//! - `POST /api/generate-tasks` - Break a goal into exactly `durationDays` tasks
//! - `GET /api/health` - Health check

mod routes;
mod tasks;
pub mod types;

pub use routes::{router, serve, AppState};
pub use tasks::ApiError;
pub use types::*;
