//! User — the root of every ownership chain.
//!
//! A user is created the first time an external identity signs in and is
//! never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:           Uuid,
  /// Subject claim issued by the external identity provider.
  pub external_id:  String,
  pub email:        String,
  pub display_name: String,
  pub avatar_url:   Option<String>,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::UserRepository::create_user`], and the identity
/// presented by the login collaborator to
/// [`UserService::sign_in`](crate::service::UserService::sign_in).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
  pub external_id:  String,
  pub email:        String,
  pub display_name: String,
  #[serde(default)]
  pub avatar_url:   Option<String>,
}
