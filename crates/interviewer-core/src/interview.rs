//! Interview — the root of the nested resource tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An interview owned by exactly one user. `owner_user_id` never changes
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
  pub id:            Uuid,
  #[serde(rename = "userId")]
  pub owner_user_id: Uuid,
  pub title:         String,
  pub description:   Option<String>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl Interview {
  pub fn is_owned_by(&self, user_id: Uuid) -> bool {
    self.owner_user_id == user_id
  }
}

/// Input to [`crate::store::InterviewRepository::create_interview`].
/// Timestamps are always set by the store.
#[derive(Debug, Clone)]
pub struct NewInterview {
  pub owner_user_id: Uuid,
  pub title:         String,
  pub description:   Option<String>,
}

/// A partial update. `None` leaves a field untouched; for `description`,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InterviewPatch {
  pub title:       Option<String>,
  #[serde(default, deserialize_with = "deserialize_nullable")]
  pub description: Option<Option<String>>,
}

impl InterviewPatch {
  pub fn apply(self, interview: &mut Interview) {
    if let Some(title) = self.title {
      interview.title = title;
    }
    if let Some(description) = self.description {
      interview.description = description;
    }
  }
}

/// Distinguish an explicit JSON `null` (clear) from an absent key (keep).
fn deserialize_nullable<'de, D>(
  deserializer: D,
) -> Result<Option<Option<String>>, D::Error>
where
  D: serde::Deserializer<'de>,
{
  Ok(Some(Option::deserialize(deserializer)?))
}
