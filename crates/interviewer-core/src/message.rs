//! Message — one turn of a take's conversational transcript.
//!
//! Messages are immutable once created; there is no update or delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
  User,
  Assistant,
}

impl MessageRole {
  pub fn as_str(self) -> &'static str { self.into() }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
  pub id:                   Uuid,
  pub take_id:              Uuid,
  pub role:                 MessageRole,
  pub content:              String,
  /// Documents the author had switched on for this turn, in the order given.
  pub enabled_document_ids: Vec<Uuid>,
  /// Server-assigned; listing order is ascending on this field.
  pub created_at:           DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
  pub take_id:              Uuid,
  pub role:                 MessageRole,
  pub content:              String,
  pub enabled_document_ids: Vec<Uuid>,
}
