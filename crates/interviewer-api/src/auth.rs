//! Acting-user extractor.
//!
//! Authentication happens upstream (OAuth/session layer or reverse proxy),
//! which forwards the signed-in user's id in a trusted header. This module
//! only reads it.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, HeaderName, request::Parts},
};
use interviewer_core::store::Store;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Header used when none is configured.
pub const DEFAULT_IDENTITY_HEADER: &str = "x-user-id";

/// The id of the user on whose behalf the request acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingUser(pub Uuid);

/// Read the acting user from `headers`.
pub fn acting_user(headers: &HeaderMap, header: &HeaderName) -> Result<Uuid, ApiError> {
  headers
    .get(header)
    .and_then(|v| v.to_str().ok())
    .and_then(|s| Uuid::parse_str(s.trim()).ok())
    .ok_or(ApiError::Unauthenticated)
}

impl<S> FromRequestParts<AppState<S>> for ActingUser
where
  S: Store + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    acting_user(&parts.headers, &state.identity_header).map(ActingUser)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn default_header() -> HeaderName {
    HeaderName::from_static(DEFAULT_IDENTITY_HEADER)
  }

  #[test]
  fn reads_uuid_from_configured_header() {
    let id = Uuid::new_v4();
    let mut headers = HeaderMap::new();
    headers.insert("x-user-id", id.to_string().parse().unwrap());

    assert_eq!(acting_user(&headers, &default_header()).unwrap(), id);

    let other = HeaderName::from_static("x-forwarded-user");
    assert!(matches!(
      acting_user(&headers, &other),
      Err(ApiError::Unauthenticated)
    ));
  }

  #[test]
  fn malformed_identity_is_unauthenticated() {
    let mut headers = HeaderMap::new();
    headers.insert("x-user-id", "not-a-uuid".parse().unwrap());
    assert!(matches!(
      acting_user(&headers, &default_header()),
      Err(ApiError::Unauthenticated)
    ));
  }
}
