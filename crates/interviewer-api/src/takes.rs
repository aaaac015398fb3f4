//! Handlers for takes.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/interviews/:id/takes` | |
//! | `POST`  | `/interviews/:id/takes` | No body; new takes start in `pre-interview` |
//! | `GET`   | `/takes/:id` | |
//! | `PATCH` | `/takes/:id` | Body: `{"stage": "pre-interview" \| "interview"}` |

use std::str::FromStr as _;

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use interviewer_core::{store::Store, take::TakeStage};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{ActingUser, AppState, error::ApiError, required};

/// `GET /interviews/:id/takes`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let Path(interview_id) = path?;
  let takes = state
    .services
    .takes
    .list_by_interview(interview_id, user_id)
    .await?;
  Ok(Json(json!({ "takes": takes })))
}

/// `POST /interviews/:id/takes`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let Path(interview_id) = path?;
  let take = state.services.takes.create(interview_id, user_id).await?;
  Ok((StatusCode::CREATED, Json(json!({ "take": take }))))
}

/// `GET /takes/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let Path(id) = path?;
  let take = state.services.takes.get_by_id(id, user_id).await?;
  Ok(Json(json!({ "take": take })))
}

#[derive(Debug, Deserialize)]
pub struct StageBody {
  pub stage: Option<String>,
}

/// `PATCH /takes/:id`. The stage string is validated here, not in the
/// service.
pub async fn update_stage<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  path: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<StageBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let Path(id) = path?;
  let Json(body) = body?;
  let stage = required(body.stage, "Stage is required")?;
  let stage = TakeStage::from_str(&stage).map_err(|_| {
    ApiError::BadRequest("Stage must be 'pre-interview' or 'interview'".to_string())
  })?;

  let take = state.services.takes.update_stage(id, user_id, stage).await?;
  Ok(Json(json!({ "take": take })))
}
