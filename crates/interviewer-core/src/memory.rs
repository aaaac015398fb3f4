//! An in-process store backed by plain vectors.
//!
//! Used as the test double for the services and handy for wiring the API
//! without a database. Deleting an interview removes its takes and their
//! messages, like the relational backend; documents are left alone.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use uuid::Uuid;

use crate::{
  document::{Document, DocumentPatch, NewDocument},
  interview::{Interview, InterviewPatch, NewInterview},
  message::{Message, NewMessage},
  store::{
    DocumentRepository, InterviewRepository, MessageRepository, Repository,
    TakeRepository, UserRepository,
  },
  take::{NewTake, Take, TakeStage},
  user::{NewUser, User},
};

#[derive(Debug, Default)]
struct Tables {
  users:      Vec<User>,
  interviews: Vec<Interview>,
  documents:  Vec<Document>,
  takes:      Vec<Take>,
  messages:   Vec<Message>,
}

/// Cloning is cheap; clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn tables(&self) -> MutexGuard<'_, Tables> {
    self.tables.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl Repository for MemoryStore {
  type Error = std::convert::Infallible;
}

// ─── Users ───────────────────────────────────────────────────────────────────

impl UserRepository for MemoryStore {
  async fn get_user(&self, id: Uuid) -> Result<Option<User>, Self::Error> {
    Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
  }

  async fn get_user_by_external_id(
    &self,
    external_id: String,
  ) -> Result<Option<User>, Self::Error> {
    Ok(
      self
        .tables()
        .users
        .iter()
        .find(|u| u.external_id == external_id)
        .cloned(),
    )
  }

  async fn create_user(&self, input: NewUser) -> Result<User, Self::Error> {
    let user = User {
      id:           Uuid::new_v4(),
      external_id:  input.external_id,
      email:        input.email,
      display_name: input.display_name,
      avatar_url:   input.avatar_url,
      created_at:   Utc::now(),
    };
    self.tables().users.push(user.clone());
    Ok(user)
  }
}

// ─── Interviews ──────────────────────────────────────────────────────────────

impl InterviewRepository for MemoryStore {
  async fn get_interview(
    &self,
    id: Uuid,
  ) -> Result<Option<Interview>, Self::Error> {
    Ok(self.tables().interviews.iter().find(|i| i.id == id).cloned())
  }

  async fn list_interviews_by_user(
    &self,
    owner_user_id: Uuid,
  ) -> Result<Vec<Interview>, Self::Error> {
    Ok(
      self
        .tables()
        .interviews
        .iter()
        .filter(|i| i.owner_user_id == owner_user_id)
        .cloned()
        .collect(),
    )
  }

  async fn create_interview(
    &self,
    input: NewInterview,
  ) -> Result<Interview, Self::Error> {
    let now = Utc::now();
    let interview = Interview {
      id:            Uuid::new_v4(),
      owner_user_id: input.owner_user_id,
      title:         input.title,
      description:   input.description,
      created_at:    now,
      updated_at:    now,
    };
    self.tables().interviews.push(interview.clone());
    Ok(interview)
  }

  async fn update_interview(
    &self,
    id: Uuid,
    patch: InterviewPatch,
  ) -> Result<Option<Interview>, Self::Error> {
    let mut tables = self.tables();
    let Some(interview) = tables.interviews.iter_mut().find(|i| i.id == id)
    else {
      return Ok(None);
    };
    patch.apply(interview);
    interview.updated_at = Utc::now();
    Ok(Some(interview.clone()))
  }

  async fn delete_interview(&self, id: Uuid) -> Result<bool, Self::Error> {
    let mut tables = self.tables();
    let before = tables.interviews.len();
    tables.interviews.retain(|i| i.id != id);
    if tables.interviews.len() == before {
      return Ok(false);
    }

    let take_ids: Vec<Uuid> = tables
      .takes
      .iter()
      .filter(|t| t.interview_id == id)
      .map(|t| t.id)
      .collect();
    tables.takes.retain(|t| t.interview_id != id);
    tables.messages.retain(|m| !take_ids.contains(&m.take_id));
    Ok(true)
  }
}

// ─── Documents ───────────────────────────────────────────────────────────────

impl DocumentRepository for MemoryStore {
  async fn get_document(&self, id: Uuid) -> Result<Option<Document>, Self::Error> {
    Ok(self.tables().documents.iter().find(|d| d.id == id).cloned())
  }

  async fn list_documents_by_interview(
    &self,
    interview_id: Uuid,
  ) -> Result<Vec<Document>, Self::Error> {
    Ok(
      self
        .tables()
        .documents
        .iter()
        .filter(|d| d.interview_id == interview_id)
        .cloned()
        .collect(),
    )
  }

  async fn create_document(
    &self,
    input: NewDocument,
  ) -> Result<Document, Self::Error> {
    let now = Utc::now();
    let document = Document {
      id:           Uuid::new_v4(),
      interview_id: input.interview_id,
      title:        input.title,
      content:      input.content,
      created_at:   now,
      updated_at:   now,
    };
    self.tables().documents.push(document.clone());
    Ok(document)
  }

  async fn update_document(
    &self,
    id: Uuid,
    patch: DocumentPatch,
  ) -> Result<Option<Document>, Self::Error> {
    let mut tables = self.tables();
    let Some(document) = tables.documents.iter_mut().find(|d| d.id == id) else {
      return Ok(None);
    };
    patch.apply(document);
    document.updated_at = Utc::now();
    Ok(Some(document.clone()))
  }

  async fn delete_document(&self, id: Uuid) -> Result<bool, Self::Error> {
    let mut tables = self.tables();
    let before = tables.documents.len();
    tables.documents.retain(|d| d.id != id);
    Ok(tables.documents.len() != before)
  }
}

// ─── Takes ───────────────────────────────────────────────────────────────────

impl TakeRepository for MemoryStore {
  async fn get_take(&self, id: Uuid) -> Result<Option<Take>, Self::Error> {
    Ok(self.tables().takes.iter().find(|t| t.id == id).cloned())
  }

  async fn list_takes_by_interview(
    &self,
    interview_id: Uuid,
  ) -> Result<Vec<Take>, Self::Error> {
    Ok(
      self
        .tables()
        .takes
        .iter()
        .filter(|t| t.interview_id == interview_id)
        .cloned()
        .collect(),
    )
  }

  async fn create_take(&self, input: NewTake) -> Result<Take, Self::Error> {
    let now = Utc::now();
    let take = Take {
      id:           Uuid::new_v4(),
      interview_id: input.interview_id,
      stage:        input.stage,
      created_at:   now,
      updated_at:   now,
    };
    self.tables().takes.push(take.clone());
    Ok(take)
  }

  async fn update_take_stage(
    &self,
    id: Uuid,
    stage: TakeStage,
  ) -> Result<Option<Take>, Self::Error> {
    let mut tables = self.tables();
    let Some(take) = tables.takes.iter_mut().find(|t| t.id == id) else {
      return Ok(None);
    };
    take.stage = stage;
    take.updated_at = Utc::now();
    Ok(Some(take.clone()))
  }
}

// ─── Messages ────────────────────────────────────────────────────────────────

impl MessageRepository for MemoryStore {
  async fn list_messages_by_take(
    &self,
    take_id: Uuid,
  ) -> Result<Vec<Message>, Self::Error> {
    let mut messages: Vec<Message> = self
      .tables()
      .messages
      .iter()
      .filter(|m| m.take_id == take_id)
      .cloned()
      .collect();
    // Stable sort: equal timestamps keep insertion order.
    messages.sort_by_key(|m| m.created_at);
    Ok(messages)
  }

  async fn create_message(
    &self,
    input: NewMessage,
  ) -> Result<Message, Self::Error> {
    let message = Message {
      id:                   Uuid::new_v4(),
      take_id:              input.take_id,
      role:                 input.role,
      content:              input.content,
      enabled_document_ids: input.enabled_document_ids,
      created_at:           Utc::now(),
    };
    self.tables().messages.push(message.clone());
    Ok(message)
  }
}
