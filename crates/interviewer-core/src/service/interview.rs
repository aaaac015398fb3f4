use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  access::verify_interview_access,
  interview::{Interview, InterviewPatch, NewInterview},
  store::{DocumentRepository, InterviewRepository},
};

/// Authorized CRUD over interviews, including the document cascade on delete.
pub struct InterviewService<S> {
  store: Arc<S>,
}

impl<S> Clone for InterviewService<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S> InterviewService<S>
where
  S: InterviewRepository + DocumentRepository,
{
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Create an interview owned by `user_id`.
  pub async fn create(
    &self,
    user_id: Uuid,
    title: String,
    description: Option<String>,
  ) -> Result<Interview> {
    let interview = self
      .store
      .create_interview(NewInterview {
        owner_user_id: user_id,
        title,
        description,
      })
      .await
      .map_err(Error::store)?;
    tracing::debug!(interview_id = %interview.id, %user_id, "interview created");
    Ok(interview)
  }

  /// The owner filter is the authorization; this cannot be refused.
  pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Interview>> {
    self
      .store
      .list_interviews_by_user(user_id)
      .await
      .map_err(Error::store)
  }

  pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Interview> {
    verify_interview_access(&*self.store, id, user_id).await
  }

  pub async fn update(
    &self,
    id: Uuid,
    user_id: Uuid,
    patch: InterviewPatch,
  ) -> Result<Interview> {
    verify_interview_access(&*self.store, id, user_id).await?;

    self
      .store
      .update_interview(id, patch)
      .await
      .map_err(Error::store)?
      .ok_or(Error::InterviewNotFound { interview_id: id })
  }

  /// Delete the interview after deleting each of its documents, one at a
  /// time. Not transactional: a failure part-way leaves the remaining
  /// documents and the interview in place.
  pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<()> {
    verify_interview_access(&*self.store, id, user_id).await?;

    let documents = self
      .store
      .list_documents_by_interview(id)
      .await
      .map_err(Error::store)?;
    let count = documents.len();
    for document in documents {
      self
        .store
        .delete_document(document.id)
        .await
        .map_err(Error::store)?;
    }

    let removed = self.store.delete_interview(id).await.map_err(Error::store)?;
    if !removed {
      return Err(Error::InterviewNotFound { interview_id: id });
    }

    tracing::info!(interview_id = %id, documents = count, "interview deleted");
    Ok(())
  }
}
