use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  access::verify_take_access,
  message::{Message, MessageRole, NewMessage},
  service::DocumentReferencePolicy,
  store::{DocumentRepository, InterviewRepository, MessageRepository, TakeRepository},
  take::Take,
};

/// Authorized access to the transcript of a take.
pub struct MessageService<S> {
  store:                     Arc<S>,
  document_reference_policy: DocumentReferencePolicy,
}

impl<S> Clone for MessageService<S> {
  fn clone(&self) -> Self {
    Self {
      store:                     self.store.clone(),
      document_reference_policy: self.document_reference_policy,
    }
  }
}

impl<S> MessageService<S>
where
  S: InterviewRepository + TakeRepository + DocumentRepository + MessageRepository,
{
  pub fn new(store: Arc<S>) -> Self {
    Self { store, document_reference_policy: DocumentReferencePolicy::default() }
  }

  pub fn with_document_reference_policy(
    mut self,
    policy: DocumentReferencePolicy,
  ) -> Self {
    self.document_reference_policy = policy;
    self
  }

  /// Messages of the take, oldest first.
  pub async fn list_by_take(
    &self,
    take_id: Uuid,
    user_id: Uuid,
  ) -> Result<Vec<Message>> {
    verify_take_access(&*self.store, take_id, user_id).await?;

    self
      .store
      .list_messages_by_take(take_id)
      .await
      .map_err(Error::store)
  }

  /// Append a message. `enabled_document_ids` is stored in the given order;
  /// whether the ids are looked up depends on the
  /// [`DocumentReferencePolicy`].
  pub async fn create(
    &self,
    take_id: Uuid,
    user_id: Uuid,
    role: MessageRole,
    content: String,
    enabled_document_ids: Vec<Uuid>,
  ) -> Result<Message> {
    let take = verify_take_access(&*self.store, take_id, user_id).await?;

    if self.document_reference_policy == DocumentReferencePolicy::SameInterview {
      self.check_document_references(&take, &enabled_document_ids).await?;
    }

    let message = self
      .store
      .create_message(NewMessage {
        take_id,
        role,
        content,
        enabled_document_ids,
      })
      .await
      .map_err(Error::store)?;
    tracing::debug!(message_id = %message.id, %take_id, role = %role, "message created");
    Ok(message)
  }

  async fn check_document_references(
    &self,
    take: &Take,
    document_ids: &[Uuid],
  ) -> Result<()> {
    for &document_id in document_ids {
      let belongs = self
        .store
        .get_document(document_id)
        .await
        .map_err(Error::store)?
        .is_some_and(|d| d.interview_id == take.interview_id);
      if !belongs {
        return Err(Error::DocumentNotFound { document_id });
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    ErrorKind,
    document::NewDocument,
    interview::NewInterview,
    memory::MemoryStore,
    take::NewTake,
  };

  async fn interview_with_take(
    store: &MemoryStore,
    owner: Uuid,
  ) -> (Uuid, Take) {
    let interview = store
      .create_interview(NewInterview {
        owner_user_id: owner,
        title:         "My Interview".into(),
        description:   None,
      })
      .await
      .unwrap();
    let take = store.create_take(NewTake::new(interview.id)).await.unwrap();
    (interview.id, take)
  }

  #[tokio::test]
  async fn messages_list_in_creation_order_across_takes() {
    let store = Arc::new(MemoryStore::new());
    let owner = Uuid::new_v4();
    let (_, first) = interview_with_take(&store, owner).await;
    let (_, second) = interview_with_take(&store, owner).await;
    let svc = MessageService::new(store);

    for i in 0..6 {
      let (take, role) = if i % 2 == 0 {
        (&first, MessageRole::User)
      } else {
        (&second, MessageRole::Assistant)
      };
      svc
        .create(take.id, owner, role, format!("m{i}"), vec![])
        .await
        .unwrap();
      svc
        .create(first.id, owner, MessageRole::Assistant, format!("r{i}"), vec![])
        .await
        .unwrap();
    }

    let listed = svc.list_by_take(first.id, owner).await.unwrap();
    let contents: Vec<_> = listed.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, [
      "m0", "r0", "r1", "m2", "r2", "r3", "m4", "r4", "r5"
    ]);
    assert!(listed.windows(2).all(|w| w[0].created_at <= w[1].created_at));

    let listed = svc.list_by_take(second.id, owner).await.unwrap();
    let contents: Vec<_> = listed.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["m1", "m3", "m5"]);
  }

  #[tokio::test]
  async fn other_user_cannot_read_or_write_transcript() {
    let store = Arc::new(MemoryStore::new());
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let (_, take) = interview_with_take(&store, owner).await;
    let svc = MessageService::new(store);

    svc
      .create(take.id, owner, MessageRole::User, "hello".into(), vec![])
      .await
      .unwrap();

    let err = svc.list_by_take(take.id, stranger).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    let err = svc
      .create(take.id, stranger, MessageRole::User, "hi".into(), vec![])
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let missing = Uuid::new_v4();
    let err = svc.list_by_take(missing, stranger).await.unwrap_err();
    assert!(matches!(err, Error::TakeNotFound { take_id } if take_id == missing));
  }

  #[tokio::test]
  async fn unchecked_policy_stores_ids_verbatim() {
    let store = Arc::new(MemoryStore::new());
    let owner = Uuid::new_v4();
    let (_, take) = interview_with_take(&store, owner).await;
    let svc = MessageService::new(store);

    let ids = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    let message = svc
      .create(take.id, owner, MessageRole::User, "q".into(), ids.clone())
      .await
      .unwrap();
    assert_eq!(message.enabled_document_ids, ids);

    let listed = svc.list_by_take(take.id, owner).await.unwrap();
    assert_eq!(listed[0].enabled_document_ids, ids);
  }

  #[tokio::test]
  async fn same_interview_policy_rejects_foreign_documents() {
    let store = Arc::new(MemoryStore::new());
    let owner = Uuid::new_v4();
    let (interview_id, take) = interview_with_take(&store, owner).await;
    let (other_interview_id, _) = interview_with_take(&store, owner).await;

    let own = store
      .create_document(NewDocument {
        interview_id,
        title: "own".into(),
        content: "c".into(),
      })
      .await
      .unwrap();
    let foreign = store
      .create_document(NewDocument {
        interview_id: other_interview_id,
        title:        "foreign".into(),
        content:      "c".into(),
      })
      .await
      .unwrap();

    let svc = MessageService::new(store)
      .with_document_reference_policy(DocumentReferencePolicy::SameInterview);

    let message = svc
      .create(take.id, owner, MessageRole::User, "ok".into(), vec![own.id])
      .await
      .unwrap();
    assert_eq!(message.enabled_document_ids, [own.id]);

    let err = svc
      .create(take.id, owner, MessageRole::User, "x".into(), vec![
        own.id, foreign.id,
      ])
      .await
      .unwrap_err();
    assert!(matches!(
      err,
      Error::DocumentNotFound { document_id } if document_id == foreign.id
    ));

    let missing = Uuid::new_v4();
    let err = svc
      .create(take.id, owner, MessageRole::User, "x".into(), vec![missing])
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DocumentNotFound);

    assert_eq!(svc.list_by_take(take.id, owner).await.unwrap().len(), 1);
  }
}
