//! Storage-failure handling between the services and a backend.
//!
//! [`Fallback`] wraps any store. Under [`StorageFailurePolicy::Degrade`] a
//! failed lookup reads as absent, a failed listing as empty, a failed update
//! as "no row" and a failed delete as "nothing removed", so callers see the
//! resource's own NotFound error. Creates always propagate: there is no
//! absent value for a row that was never written.

use std::sync::Arc;

use serde::Deserialize;
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

/// What a failed storage read, update or delete turns into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageFailurePolicy {
  /// Log at `error` and continue with the absent/empty result.
  #[default]
  Degrade,
  /// Surface the failure as [`Error::Store`](crate::Error::Store).
  Propagate,
}

/// A store whose non-create failures are handled per [`StorageFailurePolicy`].
pub struct Fallback<S> {
  inner:  Arc<S>,
  policy: StorageFailurePolicy,
}

impl<S> Fallback<S> {
  pub fn new(inner: Arc<S>, policy: StorageFailurePolicy) -> Self {
    Self { inner, policy }
  }

  pub fn policy(&self) -> StorageFailurePolicy { self.policy }
}

impl<S: Repository> Fallback<S> {
  fn recover<T: Default>(
    &self,
    op: &'static str,
    result: Result<T, S::Error>,
  ) -> Result<T, S::Error> {
    match result {
      Err(error) if self.policy == StorageFailurePolicy::Degrade => {
        tracing::error!(%error, op, "storage failure degraded to empty result");
        Ok(T::default())
      }
      other => other,
    }
  }
}

impl<S: Repository> Repository for Fallback<S> {
  type Error = S::Error;
}

impl<S: UserRepository> UserRepository for Fallback<S> {
  async fn get_user(&self, id: Uuid) -> Result<Option<User>, Self::Error> {
    self.recover("get_user", self.inner.get_user(id).await)
  }

  async fn get_user_by_external_id(
    &self,
    external_id: String,
  ) -> Result<Option<User>, Self::Error> {
    let result = self.inner.get_user_by_external_id(external_id).await;
    self.recover("get_user_by_external_id", result)
  }

  async fn create_user(&self, input: NewUser) -> Result<User, Self::Error> {
    self.inner.create_user(input).await
  }
}

impl<S: InterviewRepository> InterviewRepository for Fallback<S> {
  async fn get_interview(
    &self,
    id: Uuid,
  ) -> Result<Option<Interview>, Self::Error> {
    self.recover("get_interview", self.inner.get_interview(id).await)
  }

  async fn list_interviews_by_user(
    &self,
    owner_user_id: Uuid,
  ) -> Result<Vec<Interview>, Self::Error> {
    let result = self.inner.list_interviews_by_user(owner_user_id).await;
    self.recover("list_interviews_by_user", result)
  }

  async fn create_interview(
    &self,
    input: NewInterview,
  ) -> Result<Interview, Self::Error> {
    self.inner.create_interview(input).await
  }

  async fn update_interview(
    &self,
    id: Uuid,
    patch: InterviewPatch,
  ) -> Result<Option<Interview>, Self::Error> {
    self.recover("update_interview", self.inner.update_interview(id, patch).await)
  }

  async fn delete_interview(&self, id: Uuid) -> Result<bool, Self::Error> {
    self.recover("delete_interview", self.inner.delete_interview(id).await)
  }
}

impl<S: DocumentRepository> DocumentRepository for Fallback<S> {
  async fn get_document(&self, id: Uuid) -> Result<Option<Document>, Self::Error> {
    self.recover("get_document", self.inner.get_document(id).await)
  }

  async fn list_documents_by_interview(
    &self,
    interview_id: Uuid,
  ) -> Result<Vec<Document>, Self::Error> {
    let result = self.inner.list_documents_by_interview(interview_id).await;
    self.recover("list_documents_by_interview", result)
  }

  async fn create_document(
    &self,
    input: NewDocument,
  ) -> Result<Document, Self::Error> {
    self.inner.create_document(input).await
  }

  async fn update_document(
    &self,
    id: Uuid,
    patch: DocumentPatch,
  ) -> Result<Option<Document>, Self::Error> {
    self.recover("update_document", self.inner.update_document(id, patch).await)
  }

  async fn delete_document(&self, id: Uuid) -> Result<bool, Self::Error> {
    self.recover("delete_document", self.inner.delete_document(id).await)
  }
}

impl<S: TakeRepository> TakeRepository for Fallback<S> {
  async fn get_take(&self, id: Uuid) -> Result<Option<Take>, Self::Error> {
    self.recover("get_take", self.inner.get_take(id).await)
  }

  async fn list_takes_by_interview(
    &self,
    interview_id: Uuid,
  ) -> Result<Vec<Take>, Self::Error> {
    let result = self.inner.list_takes_by_interview(interview_id).await;
    self.recover("list_takes_by_interview", result)
  }

  async fn create_take(&self, input: NewTake) -> Result<Take, Self::Error> {
    self.inner.create_take(input).await
  }

  async fn update_take_stage(
    &self,
    id: Uuid,
    stage: TakeStage,
  ) -> Result<Option<Take>, Self::Error> {
    self.recover("update_take_stage", self.inner.update_take_stage(id, stage).await)
  }
}

impl<S: MessageRepository> MessageRepository for Fallback<S> {
  async fn list_messages_by_take(
    &self,
    take_id: Uuid,
  ) -> Result<Vec<Message>, Self::Error> {
    let result = self.inner.list_messages_by_take(take_id).await;
    self.recover("list_messages_by_take", result)
  }

  async fn create_message(
    &self,
    input: NewMessage,
  ) -> Result<Message, Self::Error> {
    self.inner.create_message(input).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::flaky::{Fault, FlakyStore};
  use crate::memory::MemoryStore;

  fn failing(policy: StorageFailurePolicy) -> Fallback<FlakyStore> {
    Fallback::new(
      Arc::new(FlakyStore::new(MemoryStore::new(), Fault::FailAll)),
      policy,
    )
  }

  #[tokio::test]
  async fn degrade_turns_failures_into_absent_results() {
    let store = failing(StorageFailurePolicy::Degrade);
    let id = Uuid::new_v4();

    assert_eq!(store.get_interview(id).await.unwrap(), None);
    assert!(store.list_documents_by_interview(id).await.unwrap().is_empty());
    assert_eq!(
      store.update_take_stage(id, TakeStage::Interview).await.unwrap(),
      None
    );
    assert!(!store.delete_document(id).await.unwrap());
    assert!(store.list_messages_by_take(id).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn creates_fail_under_either_policy() {
    for policy in [StorageFailurePolicy::Degrade, StorageFailurePolicy::Propagate] {
      let store = failing(policy);
      let result = store
        .create_interview(NewInterview {
          owner_user_id: Uuid::new_v4(),
          title:         "I".into(),
          description:   None,
        })
        .await;
      assert!(result.is_err(), "{policy:?}");
    }
  }

  #[tokio::test]
  async fn propagate_keeps_failures() {
    let store = failing(StorageFailurePolicy::Propagate);
    assert!(store.get_document(Uuid::new_v4()).await.is_err());
    assert!(store.delete_interview(Uuid::new_v4()).await.is_err());
  }
}
