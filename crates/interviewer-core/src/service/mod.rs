//! Authorization-aware services.
//!
//! Every operation takes the acting user's id, walks the ownership chain via
//! [`crate::access`], and only then touches storage. Services hold the store
//! in an `Arc` and are cheap to clone.

mod document;
mod interview;
mod message;
mod take;
mod user;

use std::sync::Arc;

use serde::Deserialize;

use crate::{
  fallback::{Fallback, StorageFailurePolicy},
  store::Store,
};

pub use document::DocumentService;
pub use interview::InterviewService;
pub use message::MessageService;
pub use take::TakeService;
pub use user::UserService;

/// How [`TakeService::update_stage`] treats a request to move a take back
/// from `interview` to `pre-interview`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StagePolicy {
  /// Any stage may be set at any time.
  #[default]
  Unrestricted,
  /// Backward moves fail with
  /// [`Error::InvalidStageTransition`](crate::Error::InvalidStageTransition).
  ForwardOnly,
}

/// How [`MessageService::create`] treats `enabled_document_ids`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentReferencePolicy {
  /// Ids are stored verbatim without any lookup.
  #[default]
  Unchecked,
  /// Each id must name a document of the take's own interview.
  SameInterview,
}

/// Behavioral switches for the services.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Policies {
  #[serde(default)]
  pub stage:              StagePolicy,
  #[serde(default)]
  pub document_reference: DocumentReferencePolicy,
  #[serde(default)]
  pub storage_failures:   StorageFailurePolicy,
}

/// All services over one shared store, behind a [`Fallback`] built from
/// [`Policies::storage_failures`].
pub struct Services<S> {
  pub users:      UserService<S>,
  pub interviews: InterviewService<S>,
  pub documents:  DocumentService<S>,
  pub takes:      TakeService<S>,
  pub messages:   MessageService<S>,
}

impl<S> Clone for Services<S> {
  fn clone(&self) -> Self {
    Self {
      users:      self.users.clone(),
      interviews: self.interviews.clone(),
      documents:  self.documents.clone(),
      takes:      self.takes.clone(),
      messages:   self.messages.clone(),
    }
  }
}

impl<S: Store> Services<Fallback<S>> {
  pub fn new(store: Arc<S>, policies: Policies) -> Self {
    let store = Arc::new(Fallback::new(store, policies.storage_failures));
    Self {
      users:      UserService::new(store.clone()),
      interviews: InterviewService::new(store.clone()),
      documents:  DocumentService::new(store.clone()),
      takes:      TakeService::new(store.clone()).with_stage_policy(policies.stage),
      messages:   MessageService::new(store)
        .with_document_reference_policy(policies.document_reference),
    }
  }
}
