//! Error taxonomy shared by every service operation.

use thiserror::Error;
use uuid::Uuid;

use crate::take::TakeStage;

#[derive(Debug, Error)]
pub enum Error {
  #[error("interview not found: {interview_id}")]
  InterviewNotFound { interview_id: Uuid },

  #[error("document not found: {document_id}")]
  DocumentNotFound { document_id: Uuid },

  #[error("take not found: {take_id}")]
  TakeNotFound { take_id: Uuid },

  #[error("user not found: {user_id}")]
  UserNotFound { user_id: Uuid },

  #[error("unauthorized: {message}")]
  Unauthorized { message: String },

  /// Only raised under [`StagePolicy::ForwardOnly`](crate::service::StagePolicy).
  #[error("take {take_id} cannot move from {from} back to {to}")]
  InvalidStageTransition {
    take_id: Uuid,
    from:    TakeStage,
    to:      TakeStage,
  },

  /// The storage backend failed. Never used for "not found".
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Fieldless mirror of [`Error`] for exhaustive matching at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  InterviewNotFound,
  DocumentNotFound,
  TakeNotFound,
  UserNotFound,
  Unauthorized,
  InvalidStageTransition,
  Store,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::InterviewNotFound { .. } => ErrorKind::InterviewNotFound,
      Self::DocumentNotFound { .. } => ErrorKind::DocumentNotFound,
      Self::TakeNotFound { .. } => ErrorKind::TakeNotFound,
      Self::UserNotFound { .. } => ErrorKind::UserNotFound,
      Self::Unauthorized { .. } => ErrorKind::Unauthorized,
      Self::InvalidStageTransition { .. } => ErrorKind::InvalidStageTransition,
      Self::Store(_) => ErrorKind::Store,
    }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(
      self.kind(),
      ErrorKind::InterviewNotFound
        | ErrorKind::DocumentNotFound
        | ErrorKind::TakeNotFound
        | ErrorKind::UserNotFound
    )
  }

  /// Wrap a backend error.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
    Self::Unauthorized { message: message.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
