//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use interviewer_core::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Service(#[from] interviewer_core::Error),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// No usable acting-user identity on the request.
  #[error("unauthenticated")]
  Unauthenticated,
}

impl From<JsonRejection> for ApiError {
  fn from(_: JsonRejection) -> Self {
    ApiError::BadRequest("Invalid JSON body".to_string())
  }
}

impl From<PathRejection> for ApiError {
  fn from(_: PathRejection) -> Self {
    ApiError::BadRequest("Invalid id".to_string())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthenticated => {
        (StatusCode::UNAUTHORIZED, "Authentication required".to_string())
      }
      ApiError::Service(e) => match e.kind() {
        ErrorKind::InterviewNotFound => {
          (StatusCode::NOT_FOUND, "Interview not found".to_string())
        }
        ErrorKind::DocumentNotFound => {
          (StatusCode::NOT_FOUND, "Document not found".to_string())
        }
        ErrorKind::TakeNotFound => {
          (StatusCode::NOT_FOUND, "Take not found".to_string())
        }
        ErrorKind::UserNotFound => {
          (StatusCode::NOT_FOUND, "User not found".to_string())
        }
        ErrorKind::Unauthorized => {
          (StatusCode::FORBIDDEN, "Unauthorized".to_string())
        }
        ErrorKind::InvalidStageTransition => (StatusCode::CONFLICT, e.to_string()),
        ErrorKind::Store => {
          tracing::error!(error = %e, "store failure");
          (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
          )
        }
      },
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
