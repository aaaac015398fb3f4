//! Document — reference material attached to an interview.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
  pub id:           Uuid,
  pub interview_id: Uuid,
  pub title:        String,
  pub content:      String,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
  pub interview_id: Uuid,
  pub title:        String,
  pub content:      String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DocumentPatch {
  pub title:   Option<String>,
  pub content: Option<String>,
}

impl DocumentPatch {
  pub fn apply(self, document: &mut Document) {
    if let Some(title) = self.title {
      document.title = title;
    }
    if let Some(content) = self.content {
      document.content = content;
    }
  }
}
