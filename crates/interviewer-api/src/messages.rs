//! Handlers for `/takes/:id/messages`.

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use interviewer_core::{message::MessageRole, store::Store};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{ActingUser, AppState, error::ApiError};

/// `GET /takes/:id/messages`, oldest first.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let Path(take_id) = path?;
  let messages = state.services.messages.list_by_take(take_id, user_id).await?;
  Ok(Json(json!({ "messages": messages })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub role:                 MessageRole,
  pub content:              String,
  #[serde(default)]
  pub enabled_document_ids: Vec<Uuid>,
}

/// `POST /takes/:id/messages`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  path: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let Path(take_id) = path?;
  let Json(body) = body?;
  let message = state
    .services
    .messages
    .create(
      take_id,
      user_id,
      body.role,
      body.content,
      body.enabled_document_ids,
    )
    .await?;
  Ok((StatusCode::CREATED, Json(json!({ "message": message }))))
}
