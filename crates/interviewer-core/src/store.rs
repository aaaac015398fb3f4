//! Storage ports — the repository traits every backend implements.
//!
//! The traits carry no authorization logic; that lives in [`crate::access`]
//! and [`crate::service`]. Absence is never an error: lookups return
//! `Ok(None)`, deletes return `Ok(false)`, listings return an empty `Vec`.
//! `Err` is reserved for genuine backend failures.
//!
//! All methods return `Send` futures so stores can be shared across a
//! multi-threaded tokio runtime behind an `Arc`.

use std::future::Future;

use uuid::Uuid;

use crate::{
  document::{Document, DocumentPatch, NewDocument},
  interview::{Interview, InterviewPatch, NewInterview},
  message::{Message, NewMessage},
  take::{NewTake, Take, TakeStage},
  user::{NewUser, User},
};

/// Shared supertrait so one backend type exposes a single error type across
/// every repository it implements.
pub trait Repository: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;
}

// ─── Users ───────────────────────────────────────────────────────────────────

/// Consumed only by the sign-in collaborator, never by resource services.
pub trait UserRepository: Repository {
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look up a user by the identity provider's subject claim.
  fn get_user_by_external_id(
    &self,
    external_id: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;
}

// ─── Interviews ──────────────────────────────────────────────────────────────

pub trait InterviewRepository: Repository {
  fn get_interview(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Interview>, Self::Error>> + Send + '_;

  /// Every interview owned by `owner_user_id`, oldest first.
  fn list_interviews_by_user(
    &self,
    owner_user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Interview>, Self::Error>> + Send + '_;

  fn create_interview(
    &self,
    input: NewInterview,
  ) -> impl Future<Output = Result<Interview, Self::Error>> + Send + '_;

  /// Apply `patch` and refresh `updated_at`. `None` if the row is gone.
  fn update_interview(
    &self,
    id: Uuid,
    patch: InterviewPatch,
  ) -> impl Future<Output = Result<Option<Interview>, Self::Error>> + Send + '_;

  /// Delete the interview; takes and their messages go with it. Documents do
  /// not cascade and must be removed first. Returns whether a row was removed.
  fn delete_interview(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── Documents ───────────────────────────────────────────────────────────────

pub trait DocumentRepository: Repository {
  fn get_document(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + '_;

  fn list_documents_by_interview(
    &self,
    interview_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  fn create_document(
    &self,
    input: NewDocument,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;

  fn update_document(
    &self,
    id: Uuid,
    patch: DocumentPatch,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + '_;

  fn delete_document(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── Takes ───────────────────────────────────────────────────────────────────

pub trait TakeRepository: Repository {
  fn get_take(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Take>, Self::Error>> + Send + '_;

  fn list_takes_by_interview(
    &self,
    interview_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Take>, Self::Error>> + Send + '_;

  fn create_take(
    &self,
    input: NewTake,
  ) -> impl Future<Output = Result<Take, Self::Error>> + Send + '_;

  /// Set the stage and refresh `updated_at`. `None` if the row is gone.
  fn update_take_stage(
    &self,
    id: Uuid,
    stage: TakeStage,
  ) -> impl Future<Output = Result<Option<Take>, Self::Error>> + Send + '_;
}

// ─── Messages ────────────────────────────────────────────────────────────────

pub trait MessageRepository: Repository {
  /// Messages of a take ordered by `created_at` ascending, ties broken by
  /// insertion order. Implementations must order in the query itself.
  fn list_messages_by_take(
    &self,
    take_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Message>, Self::Error>> + Send + '_;

  fn create_message(
    &self,
    input: NewMessage,
  ) -> impl Future<Output = Result<Message, Self::Error>> + Send + '_;
}

/// Everything a full backend provides.
pub trait Store:
  UserRepository
  + InterviewRepository
  + DocumentRepository
  + TakeRepository
  + MessageRepository
{
}

impl<T> Store for T where
  T: UserRepository
    + InterviewRepository
    + DocumentRepository
    + TakeRepository
    + MessageRepository
{
}
