//! Handlers for `/interviews` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/interviews` | Interviews owned by the acting user |
//! | `POST`   | `/interviews` | Body: `{"title": "...", "description": "..."}`; returns 201 |
//! | `GET`    | `/interviews/:id` | 404 if missing, 403 if not owned |
//! | `PATCH`  | `/interviews/:id` | Body: [`InterviewPatch`]; `"description": null` clears it |
//! | `DELETE` | `/interviews/:id` | Also deletes the interview's documents |

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use interviewer_core::{interview::InterviewPatch, store::Store};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{ActingUser, AppState, error::ApiError, required};

/// `GET /interviews`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let interviews = state.services.interviews.list_by_user(user_id).await?;
  Ok(Json(json!({ "interviews": interviews })))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title:       Option<String>,
  pub description: Option<String>,
}

/// `POST /interviews`, returns 201 with the stored interview.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let Json(body) = body?;
  let title = required(body.title, "Title is required")?;

  let interview = state
    .services
    .interviews
    .create(user_id, title, body.description)
    .await?;
  Ok((StatusCode::CREATED, Json(json!({ "interview": interview }))))
}

/// `GET /interviews/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let Path(id) = path?;
  let interview = state.services.interviews.get_by_id(id, user_id).await?;
  Ok(Json(json!({ "interview": interview })))
}

/// `PATCH /interviews/:id`
pub async fn update_one<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  path: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<InterviewPatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let Path(id) = path?;
  let Json(patch) = body?;
  let interview = state.services.interviews.update(id, user_id, patch).await?;
  Ok(Json(json!({ "interview": interview })))
}

/// `DELETE /interviews/:id`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let Path(id) = path?;
  state.services.interviews.delete(id, user_id).await?;
  Ok(Json(json!({ "success": true })))
}
