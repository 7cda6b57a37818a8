use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use detour_core::PlanError;
use serde_json::json;
use thiserror::Error;

/// Handler failures, rendered as `{ "error": ... }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("zone {0} not found")]
    ZoneNotFound(u32),
    #[error("planner task failed: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Plan(_) => StatusCode::BAD_REQUEST,
            ApiError::ZoneNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
