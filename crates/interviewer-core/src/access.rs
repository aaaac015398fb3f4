//! Ownership verification.
//!
//! [`verify_interview_access`] is the single policy decision for the whole
//! resource tree. The child helpers only resolve a document or take to its
//! parent interview id and then defer to it.

use uuid::Uuid;

use crate::{
  Error, Result,
  document::Document,
  interview::Interview,
  store::{DocumentRepository, InterviewRepository, TakeRepository},
  take::Take,
};

/// Load the interview and confirm `user_id` owns it.
///
/// Fails with [`Error::InterviewNotFound`] if the interview does not exist
/// and [`Error::Unauthorized`] if it belongs to someone else. The loaded
/// interview is returned so callers need not look it up again.
pub async fn verify_interview_access<S>(
  store: &S,
  interview_id: Uuid,
  user_id: Uuid,
) -> Result<Interview>
where
  S: InterviewRepository,
{
  let interview = store
    .get_interview(interview_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::InterviewNotFound { interview_id })?;

  if !interview.is_owned_by(user_id) {
    tracing::warn!(%interview_id, %user_id, "interview access denied");
    return Err(Error::unauthorized(
      "You do not have access to this interview",
    ));
  }

  Ok(interview)
}

/// Resolve a document and verify access to its interview.
pub async fn verify_document_access<S>(
  store: &S,
  document_id: Uuid,
  user_id: Uuid,
) -> Result<Document>
where
  S: DocumentRepository + InterviewRepository,
{
  let document = store
    .get_document(document_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::DocumentNotFound { document_id })?;

  verify_interview_access(store, document.interview_id, user_id).await?;
  Ok(document)
}

/// Resolve a take and verify access to its interview.
pub async fn verify_take_access<S>(
  store: &S,
  take_id: Uuid,
  user_id: Uuid,
) -> Result<Take>
where
  S: TakeRepository + InterviewRepository,
{
  let take = store
    .get_take(take_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::TakeNotFound { take_id })?;

  verify_interview_access(store, take.interview_id, user_id).await?;
  Ok(take)
}
