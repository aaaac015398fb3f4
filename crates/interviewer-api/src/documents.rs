//! Handlers for documents.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/interviews/:id/documents` | Documents of an owned interview |
//! | `POST`   | `/interviews/:id/documents` | Body: `{"title": "...", "content": "..."}`; returns 201 |
//! | `GET`    | `/documents/:id` | |
//! | `PATCH`  | `/documents/:id` | Body: [`DocumentPatch`] |
//! | `DELETE` | `/documents/:id` | |

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use interviewer_core::{document::DocumentPatch, store::Store};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{ActingUser, AppState, error::ApiError, required};

/// `GET /interviews/:id/documents`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let Path(interview_id) = path?;
  let documents = state
    .services
    .documents
    .list_by_interview(interview_id, user_id)
    .await?;
  Ok(Json(json!({ "documents": documents })))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title:   Option<String>,
  pub content: Option<String>,
}

/// `POST /interviews/:id/documents`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  path: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let Path(interview_id) = path?;
  let Json(body) = body?;
  let title = required(body.title, "Title is required")?;
  let content = required(body.content, "Content is required")?;

  let document = state
    .services
    .documents
    .create(interview_id, user_id, title, content)
    .await?;
  Ok((StatusCode::CREATED, Json(json!({ "document": document }))))
}

/// `GET /documents/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let Path(id) = path?;
  let document = state.services.documents.get_by_id(id, user_id).await?;
  Ok(Json(json!({ "document": document })))
}

/// `PATCH /documents/:id`
pub async fn update_one<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  path: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<DocumentPatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let Path(id) = path?;
  let Json(patch) = body?;
  let document = state.services.documents.update(id, user_id, patch).await?;
  Ok(Json(json!({ "document": document })))
}

/// `DELETE /documents/:id`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let Path(id) = path?;
  state.services.documents.delete(id, user_id).await?;
  Ok(Json(json!({ "success": true })))
}
