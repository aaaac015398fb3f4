//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are fixed-width RFC 3339 strings with nanosecond precision, so
//! lexicographic order in SQL equals chronological order. UUIDs are stored
//! as hyphenated lowercase strings; id lists as compact JSON arrays.

use std::str::FromStr as _;

use chrono::{DateTime, SecondsFormat, Utc};
use interviewer_core::{
  document::Document,
  interview::Interview,
  message::{Message, MessageRole},
  take::{Take, TakeStage},
  user::User,
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_uuid_list(ids: &[Uuid]) -> Result<String> {
  Ok(serde_json::to_string(ids)?)
}

pub fn decode_uuid_list(s: &str) -> Result<Vec<Uuid>> {
  Ok(serde_json::from_str(s)?)
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enumerations ────────────────────────────────────────────────────────────

pub fn decode_stage(s: &str) -> Result<TakeStage> {
  TakeStage::from_str(s).map_err(|_| Error::UnknownValue {
    column: "stage",
    value:  s.to_owned(),
  })
}

pub fn decode_role(s: &str) -> Result<MessageRole> {
  MessageRole::from_str(s).map_err(|_| Error::UnknownValue {
    column: "role",
    value:  s.to_owned(),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str =
  "id, external_id, email, display_name, avatar_url, created_at";

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub id:           String,
  pub external_id:  String,
  pub email:        String,
  pub display_name: String,
  pub avatar_url:   Option<String>,
  pub created_at:   String,
}

impl RawUser {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      external_id:  row.get(1)?,
      email:        row.get(2)?,
      display_name: row.get(3)?,
      avatar_url:   row.get(4)?,
      created_at:   row.get(5)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:           decode_uuid(&self.id)?,
      external_id:  self.external_id,
      email:        self.email,
      display_name: self.display_name,
      avatar_url:   self.avatar_url,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

pub const INTERVIEW_COLUMNS: &str =
  "id, user_id, title, description, created_at, updated_at";

pub struct RawInterview {
  pub id:          String,
  pub user_id:     String,
  pub title:       String,
  pub description: Option<String>,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawInterview {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      user_id:     row.get(1)?,
      title:       row.get(2)?,
      description: row.get(3)?,
      created_at:  row.get(4)?,
      updated_at:  row.get(5)?,
    })
  }

  pub fn into_interview(self) -> Result<Interview> {
    Ok(Interview {
      id:            decode_uuid(&self.id)?,
      owner_user_id: decode_uuid(&self.user_id)?,
      title:         self.title,
      description:   self.description,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

pub const DOCUMENT_COLUMNS: &str =
  "id, interview_id, title, content, created_at, updated_at";

pub struct RawDocument {
  pub id:           String,
  pub interview_id: String,
  pub title:        String,
  pub content:      String,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawDocument {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      interview_id: row.get(1)?,
      title:        row.get(2)?,
      content:      row.get(3)?,
      created_at:   row.get(4)?,
      updated_at:   row.get(5)?,
    })
  }

  pub fn into_document(self) -> Result<Document> {
    Ok(Document {
      id:           decode_uuid(&self.id)?,
      interview_id: decode_uuid(&self.interview_id)?,
      title:        self.title,
      content:      self.content,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

pub const TAKE_COLUMNS: &str =
  "id, interview_id, stage, created_at, updated_at";

pub struct RawTake {
  pub id:           String,
  pub interview_id: String,
  pub stage:        String,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawTake {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      interview_id: row.get(1)?,
      stage:        row.get(2)?,
      created_at:   row.get(3)?,
      updated_at:   row.get(4)?,
    })
  }

  pub fn into_take(self) -> Result<Take> {
    Ok(Take {
      id:           decode_uuid(&self.id)?,
      interview_id: decode_uuid(&self.interview_id)?,
      stage:        decode_stage(&self.stage)?,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

pub const MESSAGE_COLUMNS: &str =
  "id, take_id, role, content, enabled_document_ids, created_at";

pub struct RawMessage {
  pub id:                   String,
  pub take_id:              String,
  pub role:                 String,
  pub content:              String,
  pub enabled_document_ids: String,
  pub created_at:           String,
}

impl RawMessage {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                   row.get(0)?,
      take_id:              row.get(1)?,
      role:                 row.get(2)?,
      content:              row.get(3)?,
      enabled_document_ids: row.get(4)?,
      created_at:           row.get(5)?,
    })
  }

  pub fn into_message(self) -> Result<Message> {
    Ok(Message {
      id:                   decode_uuid(&self.id)?,
      take_id:              decode_uuid(&self.take_id)?,
      role:                 decode_role(&self.role)?,
      content:              self.content,
      enabled_document_ids: decode_uuid_list(&self.enabled_document_ids)?,
      created_at:           decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn encoded_timestamps_sort_chronologically() {
    let whole = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let later = whole + chrono::Duration::nanoseconds(1_500);
    assert!(encode_dt(whole) < encode_dt(later));
    assert_eq!(encode_dt(whole).len(), encode_dt(later).len());
    assert_eq!(decode_dt(&encode_dt(later)).unwrap(), later);
  }

  #[test]
  fn unknown_enum_text_is_rejected() {
    assert!(matches!(
      decode_stage("done"),
      Err(Error::UnknownValue { column: "stage", .. })
    ));
    assert_eq!(decode_role("assistant").unwrap(), MessageRole::Assistant);
  }
}
