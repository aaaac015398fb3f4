use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  access::{verify_document_access, verify_interview_access},
  document::{Document, DocumentPatch, NewDocument},
  store::{DocumentRepository, InterviewRepository},
};

/// Authorized CRUD over the documents of an interview.
pub struct DocumentService<S> {
  store: Arc<S>,
}

impl<S> Clone for DocumentService<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S> DocumentService<S>
where
  S: InterviewRepository + DocumentRepository,
{
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Document> {
    verify_document_access(&*self.store, id, user_id).await
  }

  /// Documents of a verified interview; no per-document check is needed.
  pub async fn list_by_interview(
    &self,
    interview_id: Uuid,
    user_id: Uuid,
  ) -> Result<Vec<Document>> {
    verify_interview_access(&*self.store, interview_id, user_id).await?;

    self
      .store
      .list_documents_by_interview(interview_id)
      .await
      .map_err(Error::store)
  }

  pub async fn create(
    &self,
    interview_id: Uuid,
    user_id: Uuid,
    title: String,
    content: String,
  ) -> Result<Document> {
    verify_interview_access(&*self.store, interview_id, user_id).await?;

    let document = self
      .store
      .create_document(NewDocument { interview_id, title, content })
      .await
      .map_err(Error::store)?;
    tracing::debug!(document_id = %document.id, %interview_id, "document created");
    Ok(document)
  }

  /// A document deleted between the access check and the write surfaces as
  /// [`Error::DocumentNotFound`], same as one that never existed.
  pub async fn update(
    &self,
    id: Uuid,
    user_id: Uuid,
    patch: DocumentPatch,
  ) -> Result<Document> {
    verify_document_access(&*self.store, id, user_id).await?;

    self
      .store
      .update_document(id, patch)
      .await
      .map_err(Error::store)?
      .ok_or(Error::DocumentNotFound { document_id: id })
  }

  pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<()> {
    verify_document_access(&*self.store, id, user_id).await?;

    let removed = self.store.delete_document(id).await.map_err(Error::store)?;
    if !removed {
      return Err(Error::DocumentNotFound { document_id: id });
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;
  use crate::{
    ErrorKind,
    interview::{Interview, NewInterview},
    memory::MemoryStore,
  };

  struct Fixture {
    svc:       DocumentService<MemoryStore>,
    store:     Arc<MemoryStore>,
    owner:     Uuid,
    interview: Interview,
  }

  async fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let owner = Uuid::new_v4();
    let interview = store
      .create_interview(NewInterview {
        owner_user_id: owner,
        title:         "My Interview".into(),
        description:   None,
      })
      .await
      .unwrap();
    Fixture {
      svc: DocumentService::new(store.clone()),
      store,
      owner,
      interview,
    }
  }

  #[tokio::test]
  async fn other_user_is_unauthorized_and_missing_id_is_not_found() {
    let f = fixture().await;
    let doc = f
      .svc
      .create(f.interview.id, f.owner, "D".into(), "c".into())
      .await
      .unwrap();

    let err = f.svc.get_by_id(doc.id, Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let missing = Uuid::new_v4();
    let err = f.svc.get_by_id(missing, f.owner).await.unwrap_err();
    assert!(matches!(
      err,
      Error::DocumentNotFound { document_id } if document_id == missing
    ));
  }

  #[tokio::test]
  async fn not_found_wins_over_unauthorized() {
    let f = fixture().await;
    let stranger = Uuid::new_v4();
    let missing = Uuid::new_v4();

    for err in [
      f.svc.get_by_id(missing, stranger).await.unwrap_err(),
      f.svc
        .update(missing, stranger, DocumentPatch::default())
        .await
        .unwrap_err(),
      f.svc.delete(missing, stranger).await.unwrap_err(),
    ] {
      assert_eq!(err.kind(), ErrorKind::DocumentNotFound);
    }

    let err = f
      .svc
      .list_by_interview(missing, stranger)
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InterviewNotFound);
  }

  #[tokio::test]
  async fn create_and_list_require_ownership() {
    let f = fixture().await;
    let stranger = Uuid::new_v4();

    let err = f
      .svc
      .create(f.interview.id, stranger, "D".into(), "c".into())
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    f.svc
      .create(f.interview.id, f.owner, "D1".into(), "c".into())
      .await
      .unwrap();
    f.svc
      .create(f.interview.id, f.owner, "D2".into(), "c".into())
      .await
      .unwrap();

    let err = f
      .svc
      .list_by_interview(f.interview.id, stranger)
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let docs = f
      .svc
      .list_by_interview(f.interview.id, f.owner)
      .await
      .unwrap();
    let titles: Vec<_> = docs.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, ["D1", "D2"]);
  }

  #[tokio::test]
  async fn title_only_update_preserves_content() {
    let f = fixture().await;
    let doc = f
      .svc
      .create(f.interview.id, f.owner, "Resume".into(), "body".into())
      .await
      .unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;

    let updated = f
      .svc
      .update(doc.id, f.owner, DocumentPatch {
        title:   Some("CV".into()),
        content: None,
      })
      .await
      .unwrap();

    assert_eq!(updated.title, "CV");
    assert_eq!(updated.content, "body");
    assert_eq!(updated.created_at, doc.created_at);
    assert!(updated.updated_at > doc.updated_at);
  }

  #[tokio::test]
  async fn delete_removes_document() {
    let f = fixture().await;
    let doc = f
      .svc
      .create(f.interview.id, f.owner, "D".into(), "c".into())
      .await
      .unwrap();

    let err = f.svc.delete(doc.id, Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    f.svc.delete(doc.id, f.owner).await.unwrap();

    let err = f.svc.get_by_id(doc.id, f.owner).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DocumentNotFound);
    assert!(
      f.store
        .list_documents_by_interview(f.interview.id)
        .await
        .unwrap()
        .is_empty()
    );
  }

  #[tokio::test]
  async fn orphaned_document_reports_missing_interview() {
    let f = fixture().await;
    let doc = f
      .svc
      .create(f.interview.id, f.owner, "D".into(), "c".into())
      .await
      .unwrap();
    // The memory store does not cascade documents.
    f.store.delete_interview(f.interview.id).await.unwrap();

    let err = f.svc.get_by_id(doc.id, f.owner).await.unwrap_err();
    assert!(matches!(
      err,
      Error::InterviewNotFound { interview_id } if interview_id == f.interview.id
    ));
  }
}
