//! A [`MemoryStore`] wrapper that injects storage faults for service tests.

use uuid::Uuid;

use crate::{
  document::{Document, DocumentPatch, NewDocument},
  interview::{Interview, InterviewPatch, NewInterview},
  memory::MemoryStore,
  message::{Message, NewMessage},
  store::{
    DocumentRepository, InterviewRepository, MessageRepository, Repository,
    TakeRepository, UserRepository,
  },
  take::{NewTake, Take, TakeStage},
  user::{NewUser, User},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
  /// Every operation fails.
  FailAll,
  /// Updates and deletes find their row already gone, as if a concurrent
  /// request removed it right after the access check.
  VanishOnWrite,
}

#[derive(Debug, thiserror::Error)]
#[error("simulated storage outage")]
pub struct Outage;

/// Shares tables with the wrapped [`MemoryStore`], so fixtures can be built
/// through a fault-free clone.
pub struct FlakyStore {
  inner: MemoryStore,
  fault: Fault,
}

impl FlakyStore {
  pub fn new(inner: MemoryStore, fault: Fault) -> Self { Self { inner, fault } }

  fn check(&self) -> Result<(), Outage> {
    match self.fault {
      Fault::FailAll => Err(Outage),
      Fault::VanishOnWrite => Ok(()),
    }
  }

  fn vanishes(&self) -> bool { self.fault == Fault::VanishOnWrite }
}

impl Repository for FlakyStore {
  type Error = Outage;
}

impl UserRepository for FlakyStore {
  async fn get_user(&self, id: Uuid) -> Result<Option<User>, Outage> {
    self.check()?;
    let Ok(user) = self.inner.get_user(id).await;
    Ok(user)
  }

  async fn get_user_by_external_id(
    &self,
    external_id: String,
  ) -> Result<Option<User>, Outage> {
    self.check()?;
    let Ok(user) = self.inner.get_user_by_external_id(external_id).await;
    Ok(user)
  }

  async fn create_user(&self, input: NewUser) -> Result<User, Outage> {
    self.check()?;
    let Ok(user) = self.inner.create_user(input).await;
    Ok(user)
  }
}

impl InterviewRepository for FlakyStore {
  async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>, Outage> {
    self.check()?;
    let Ok(interview) = self.inner.get_interview(id).await;
    Ok(interview)
  }

  async fn list_interviews_by_user(
    &self,
    owner_user_id: Uuid,
  ) -> Result<Vec<Interview>, Outage> {
    self.check()?;
    let Ok(interviews) = self.inner.list_interviews_by_user(owner_user_id).await;
    Ok(interviews)
  }

  async fn create_interview(&self, input: NewInterview) -> Result<Interview, Outage> {
    self.check()?;
    let Ok(interview) = self.inner.create_interview(input).await;
    Ok(interview)
  }

  async fn update_interview(
    &self,
    id: Uuid,
    patch: InterviewPatch,
  ) -> Result<Option<Interview>, Outage> {
    self.check()?;
    if self.vanishes() {
      let Ok(_) = self.inner.delete_interview(id).await;
    }
    let Ok(interview) = self.inner.update_interview(id, patch).await;
    Ok(interview)
  }

  async fn delete_interview(&self, id: Uuid) -> Result<bool, Outage> {
    self.check()?;
    if self.vanishes() {
      let Ok(_) = self.inner.delete_interview(id).await;
    }
    let Ok(removed) = self.inner.delete_interview(id).await;
    Ok(removed)
  }
}

impl DocumentRepository for FlakyStore {
  async fn get_document(&self, id: Uuid) -> Result<Option<Document>, Outage> {
    self.check()?;
    let Ok(document) = self.inner.get_document(id).await;
    Ok(document)
  }

  async fn list_documents_by_interview(
    &self,
    interview_id: Uuid,
  ) -> Result<Vec<Document>, Outage> {
    self.check()?;
    let Ok(documents) = self.inner.list_documents_by_interview(interview_id).await;
    Ok(documents)
  }

  async fn create_document(&self, input: NewDocument) -> Result<Document, Outage> {
    self.check()?;
    let Ok(document) = self.inner.create_document(input).await;
    Ok(document)
  }

  async fn update_document(
    &self,
    id: Uuid,
    patch: DocumentPatch,
  ) -> Result<Option<Document>, Outage> {
    self.check()?;
    if self.vanishes() {
      let Ok(_) = self.inner.delete_document(id).await;
    }
    let Ok(document) = self.inner.update_document(id, patch).await;
    Ok(document)
  }

  async fn delete_document(&self, id: Uuid) -> Result<bool, Outage> {
    self.check()?;
    if self.vanishes() {
      let Ok(_) = self.inner.delete_document(id).await;
    }
    let Ok(removed) = self.inner.delete_document(id).await;
    Ok(removed)
  }
}

impl TakeRepository for FlakyStore {
  async fn get_take(&self, id: Uuid) -> Result<Option<Take>, Outage> {
    self.check()?;
    let Ok(take) = self.inner.get_take(id).await;
    Ok(take)
  }

  async fn list_takes_by_interview(
    &self,
    interview_id: Uuid,
  ) -> Result<Vec<Take>, Outage> {
    self.check()?;
    let Ok(takes) = self.inner.list_takes_by_interview(interview_id).await;
    Ok(takes)
  }

  async fn create_take(&self, input: NewTake) -> Result<Take, Outage> {
    self.check()?;
    let Ok(take) = self.inner.create_take(input).await;
    Ok(take)
  }

  async fn update_take_stage(
    &self,
    id: Uuid,
    stage: TakeStage,
  ) -> Result<Option<Take>, Outage> {
    self.check()?;
    if self.vanishes() {
      // No take-level delete; dropping the parent interview cascades.
      let Ok(take) = self.inner.get_take(id).await;
      if let Some(take) = take {
        let Ok(_) = self.inner.delete_interview(take.interview_id).await;
      }
    }
    let Ok(take) = self.inner.update_take_stage(id, stage).await;
    Ok(take)
  }
}

impl MessageRepository for FlakyStore {
  async fn list_messages_by_take(&self, take_id: Uuid) -> Result<Vec<Message>, Outage> {
    self.check()?;
    let Ok(messages) = self.inner.list_messages_by_take(take_id).await;
    Ok(messages)
  }

  async fn create_message(&self, input: NewMessage) -> Result<Message, Outage> {
    self.check()?;
    let Ok(message) = self.inner.create_message(input).await;
    Ok(message)
  }
}
