//! Task generation endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::generation::GenerationError;

use super::routes::AppState;
use super::types::{ErrorResponse, GenerateTasksRequest, GenerateTasksResponse};

/// A generation failure rendered as `{ error, kind, details? }`.
#[derive(Debug)]
pub struct ApiError(pub GenerationError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            GenerationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GenerationError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::from(&self.0))).into_response()
    }
}

/// Break a goal down into exactly `durationDays` tasks.
///
/// Nothing is persisted; the client stores whichever tasks the user accepts.
pub async fn generate_tasks(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateTasksRequest>, JsonRejection>,
) -> Result<Json<GenerateTasksResponse>, ApiError> {
    let Json(body) = payload
        .map_err(|rejection| GenerationError::InvalidInput(rejection.body_text()))?;
    let request = body.into_generation_request()?;

    tracing::info!(
        "Received generation request: durationDays={}, goal={} chars",
        request.duration_days,
        request.goal_description.chars().count()
    );

    match state.generator.generate(&request).await {
        Ok(generated) => Ok(Json(GenerateTasksResponse {
            tasks: generated.tasks,
        })),
        Err(e) => {
            tracing::error!("Task generation failed ({}): {}", e.kind(), e);
            Err(e.into())
        }
    }
}
