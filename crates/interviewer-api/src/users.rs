//! Handlers for `/auth` endpoints.
//!
//! `POST /auth/sign-in` is called by the upstream login collaborator once it
//! has verified an external identity; it is not itself authenticated and
//! must not be exposed beyond that collaborator.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  response::IntoResponse,
};
use interviewer_core::{store::Store, user::NewUser};
use serde_json::json;

use crate::{ActingUser, AppState, error::ApiError};

/// `POST /auth/sign-in`: find or create the user for an external identity.
pub async fn sign_in<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<NewUser>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let Json(identity) = body?;
  if identity.external_id.is_empty() {
    return Err(ApiError::BadRequest("External id is required".to_string()));
  }
  let user = state.services.users.sign_in(identity).await?;
  Ok(Json(json!({ "user": user })))
}

/// `GET /auth/me`
pub async fn me<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + 'static,
{
  let user = state.services.users.get_by_id(user_id).await?;
  Ok(Json(json!({ "user": user })))
}
