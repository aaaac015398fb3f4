//! JSON REST API for the interviewer services.
//!
//! Exposes two axum [`Router`]s backed by any [`Store`]:
//!
//! - [`api_router`]: the resource routes. Every route acts on behalf of the
//!   user named by the identity header (see [`auth`]).
//! - [`login_router`]: `POST /auth/sign-in`, unauthenticated, for the login
//!   collaborator only. Bind it where the public cannot reach it.
//!
//! TLS and the login handshake are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let public = Router::new().nest("/api", interviewer_api::api_router(state.clone()));
//! let internal = interviewer_api::login_router(state);
//! ```

pub mod auth;
pub mod documents;
pub mod error;
pub mod interviews;
pub mod messages;
pub mod takes;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  http::HeaderName,
  routing::{get, post},
};
use interviewer_core::{
  fallback::Fallback,
  service::{Policies, Services},
  store::Store,
};
use tower_http::trace::TraceLayer;

pub use auth::{ActingUser, DEFAULT_IDENTITY_HEADER};
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub services:        Services<Fallback<S>>,
  /// Header carrying the acting user's id, set by the upstream auth layer.
  pub identity_header: Arc<HeaderName>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      services:        self.services.clone(),
      identity_header: self.identity_header.clone(),
    }
  }
}

impl<S: Store> AppState<S> {
  pub fn new(store: Arc<S>, identity_header: HeaderName, policies: Policies) -> Self {
    Self {
      services:        Services::new(store, policies),
      identity_header: Arc::new(identity_header),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: Store + 'static,
{
  Router::new()
    // Interviews
    .route(
      "/interviews",
      get(interviews::list::<S>).post(interviews::create::<S>),
    )
    .route(
      "/interviews/{id}",
      get(interviews::get_one::<S>)
        .patch(interviews::update_one::<S>)
        .delete(interviews::delete_one::<S>),
    )
    // Documents
    .route(
      "/interviews/{id}/documents",
      get(documents::list::<S>).post(documents::create::<S>),
    )
    .route(
      "/documents/{id}",
      get(documents::get_one::<S>)
        .patch(documents::update_one::<S>)
        .delete(documents::delete_one::<S>),
    )
    // Takes
    .route(
      "/interviews/{id}/takes",
      get(takes::list::<S>).post(takes::create::<S>),
    )
    .route(
      "/takes/{id}",
      get(takes::get_one::<S>).patch(takes::update_stage::<S>),
    )
    // Messages
    .route(
      "/takes/{id}/messages",
      get(messages::list::<S>).post(messages::create::<S>),
    )
    // Users
    .route("/auth/me", get(users::me::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Build the router for the login collaborator.
///
/// Sign-in trusts its body, so whoever reaches this router can mint a user
/// for any external identity. Never merge it into [`api_router`]'s listener.
pub fn login_router<S>(state: AppState<S>) -> Router<()>
where
  S: Store + 'static,
{
  Router::new()
    .route("/auth/sign-in", post(users::sign_in::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Reject a missing or empty string field with the given message.
pub(crate) fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
  value
    .filter(|v| !v.is_empty())
    .ok_or_else(|| ApiError::BadRequest(message.to_string()))
}
