use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  access::{verify_interview_access, verify_take_access},
  service::StagePolicy,
  store::{InterviewRepository, TakeRepository},
  take::{NewTake, Take, TakeStage},
};

/// Authorized access to the takes of an interview.
pub struct TakeService<S> {
  store:        Arc<S>,
  stage_policy: StagePolicy,
}

impl<S> Clone for TakeService<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), stage_policy: self.stage_policy }
  }
}

impl<S> TakeService<S>
where
  S: InterviewRepository + TakeRepository,
{
  pub fn new(store: Arc<S>) -> Self {
    Self { store, stage_policy: StagePolicy::default() }
  }

  pub fn with_stage_policy(mut self, policy: StagePolicy) -> Self {
    self.stage_policy = policy;
    self
  }

  pub fn stage_policy(&self) -> StagePolicy { self.stage_policy }

  /// Start a new take in [`TakeStage::PreInterview`].
  pub async fn create(&self, interview_id: Uuid, user_id: Uuid) -> Result<Take> {
    verify_interview_access(&*self.store, interview_id, user_id).await?;

    let take = self
      .store
      .create_take(NewTake::new(interview_id))
      .await
      .map_err(Error::store)?;
    tracing::debug!(take_id = %take.id, %interview_id, "take created");
    Ok(take)
  }

  pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Take> {
    verify_take_access(&*self.store, id, user_id).await
  }

  pub async fn list_by_interview(
    &self,
    interview_id: Uuid,
    user_id: Uuid,
  ) -> Result<Vec<Take>> {
    verify_interview_access(&*self.store, interview_id, user_id).await?;

    self
      .store
      .list_takes_by_interview(interview_id)
      .await
      .map_err(Error::store)
  }

  /// Move a take to `stage`, subject to the configured [`StagePolicy`].
  pub async fn update_stage(
    &self,
    id: Uuid,
    user_id: Uuid,
    stage: TakeStage,
  ) -> Result<Take> {
    let take = verify_take_access(&*self.store, id, user_id).await?;

    if self.stage_policy == StagePolicy::ForwardOnly && stage < take.stage {
      return Err(Error::InvalidStageTransition {
        take_id: id,
        from:    take.stage,
        to:      stage,
      });
    }

    let updated = self
      .store
      .update_take_stage(id, stage)
      .await
      .map_err(Error::store)?
      .ok_or(Error::TakeNotFound { take_id: id })?;
    tracing::debug!(take_id = %id, from = %take.stage, to = %stage, "take stage updated");
    Ok(updated)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    ErrorKind,
    interview::{Interview, NewInterview},
    memory::MemoryStore,
  };

  async fn setup() -> (Arc<MemoryStore>, Uuid, Interview) {
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
    (store, owner, interview)
  }

  #[tokio::test]
  async fn new_take_starts_pre_interview_and_advances() {
    let (store, owner, interview) = setup().await;
    let svc = TakeService::new(store);

    let take = svc.create(interview.id, owner).await.unwrap();
    assert_eq!(take.stage, TakeStage::PreInterview);
    assert_eq!(take.interview_id, interview.id);

    svc
      .update_stage(take.id, owner, TakeStage::Interview)
      .await
      .unwrap();
    let fetched = svc.get_by_id(take.id, owner).await.unwrap();
    assert_eq!(fetched.stage, TakeStage::Interview);
    assert!(fetched.updated_at >= take.updated_at);

    let err = svc
      .update_stage(take.id, Uuid::new_v4(), TakeStage::Interview)
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
  }

  #[tokio::test]
  async fn missing_take_is_not_found() {
    let (store, owner, _) = setup().await;
    let svc = TakeService::new(store);
    let missing = Uuid::new_v4();

    let err = svc.get_by_id(missing, owner).await.unwrap_err();
    assert!(matches!(err, Error::TakeNotFound { take_id } if take_id == missing));

    let err = svc
      .update_stage(missing, Uuid::new_v4(), TakeStage::Interview)
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TakeNotFound);
  }

  #[tokio::test]
  async fn list_is_scoped_to_verified_interview() {
    let (store, owner, interview) = setup().await;
    let svc = TakeService::new(store);

    svc.create(interview.id, owner).await.unwrap();
    svc.create(interview.id, owner).await.unwrap();

    assert_eq!(svc.list_by_interview(interview.id, owner).await.unwrap().len(), 2);

    let err = svc
      .list_by_interview(interview.id, Uuid::new_v4())
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let err = svc.create(interview.id, Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
  }

  #[tokio::test]
  async fn unrestricted_policy_allows_moving_back() {
    let (store, owner, interview) = setup().await;
    let svc = TakeService::new(store);
    assert_eq!(svc.stage_policy(), StagePolicy::Unrestricted);

    let take = svc.create(interview.id, owner).await.unwrap();
    svc
      .update_stage(take.id, owner, TakeStage::Interview)
      .await
      .unwrap();
    let back = svc
      .update_stage(take.id, owner, TakeStage::PreInterview)
      .await
      .unwrap();
    assert_eq!(back.stage, TakeStage::PreInterview);
  }

  #[tokio::test]
  async fn forward_only_policy_rejects_moving_back() {
    let (store, owner, interview) = setup().await;
    let svc = TakeService::new(store).with_stage_policy(StagePolicy::ForwardOnly);

    let take = svc.create(interview.id, owner).await.unwrap();
    svc
      .update_stage(take.id, owner, TakeStage::Interview)
      .await
      .unwrap();
    // Re-asserting the current stage is fine.
    svc
      .update_stage(take.id, owner, TakeStage::Interview)
      .await
      .unwrap();

    let err = svc
      .update_stage(take.id, owner, TakeStage::PreInterview)
      .await
      .unwrap_err();
    assert!(matches!(
      err,
      Error::InvalidStageTransition {
        from: TakeStage::Interview,
        to: TakeStage::PreInterview,
        ..
      }
    ));
    let fetched = svc.get_by_id(take.id, owner).await.unwrap();
    assert_eq!(fetched.stage, TakeStage::Interview);
  }
}
