use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  store::UserRepository,
  user::{NewUser, User},
};

/// The login collaborator's view of users. Resource services never use it.
pub struct UserService<S> {
  store: Arc<S>,
}

impl<S> Clone for UserService<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S> UserService<S>
where
  S: UserRepository,
{
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Find the user for an external identity, creating it on first sign-in.
  /// An existing user is returned as stored; profile fields are not refreshed.
  pub async fn sign_in(&self, identity: NewUser) -> Result<User> {
    if let Some(user) = self
      .store
      .get_user_by_external_id(identity.external_id.clone())
      .await
      .map_err(Error::store)?
    {
      return Ok(user);
    }

    let user = self.store.create_user(identity).await.map_err(Error::store)?;
    tracing::info!(user_id = %user.id, "user registered on first sign-in");
    Ok(user)
  }

  pub async fn get_by_id(&self, user_id: Uuid) -> Result<User> {
    self
      .store
      .get_user(user_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::UserNotFound { user_id })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::memory::MemoryStore;

  fn identity(sub: &str, email: &str) -> NewUser {
    NewUser {
      external_id:  sub.into(),
      email:        email.into(),
      display_name: "Ada".into(),
      avatar_url:   None,
    }
  }

  #[tokio::test]
  async fn sign_in_is_idempotent_per_external_id() {
    let svc = UserService::new(Arc::new(MemoryStore::new()));

    let first = svc.sign_in(identity("sub-1", "ada@example.com")).await.unwrap();
    let again = svc
      .sign_in(identity("sub-1", "changed@example.com"))
      .await
      .unwrap();
    assert_eq!(first, again);
    assert_eq!(again.email, "ada@example.com");

    let other = svc.sign_in(identity("sub-2", "bob@example.com")).await.unwrap();
    assert_ne!(other.id, first.id);
  }

  #[tokio::test]
  async fn get_by_id_reports_missing_user() {
    let svc = UserService::new(Arc::new(MemoryStore::new()));
    let user = svc.sign_in(identity("sub-1", "ada@example.com")).await.unwrap();

    assert_eq!(svc.get_by_id(user.id).await.unwrap(), user);

    let missing = Uuid::new_v4();
    let err = svc.get_by_id(missing).await.unwrap_err();
    assert!(matches!(err, Error::UserNotFound { user_id } if user_id == missing));
  }
}
