//! Take — one attempt at an interview, with a two-state stage marker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

/// Lifecycle marker of a take. Variants are declared in forward order, so
/// `PreInterview < Interview`.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TakeStage {
  #[default]
  PreInterview,
  Interview,
}

impl TakeStage {
  pub fn as_str(self) -> &'static str { self.into() }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Take {
  pub id:           Uuid,
  pub interview_id: Uuid,
  pub stage:        TakeStage,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTake {
  pub interview_id: Uuid,
  pub stage:        TakeStage,
}

impl NewTake {
  /// A fresh take always starts before the interview.
  pub fn new(interview_id: Uuid) -> Self {
    Self { interview_id, stage: TakeStage::PreInterview }
  }
}
