//! [`SqliteStore`] — the SQLite implementation of the repository traits.

use std::path::Path;

use chrono::Utc;
use interviewer_core::{
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
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    DOCUMENT_COLUMNS, INTERVIEW_COLUMNS, MESSAGE_COLUMNS, RawDocument,
    RawInterview, RawMessage, RawTake, RawUser, TAKE_COLUMNS, USER_COLUMNS,
    encode_dt, encode_uuid, encode_uuid_list,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An interviewer store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("sqlite schema initialised");
    Ok(())
  }

  /// Run `DELETE` against `table` by primary key; `true` if a row went away.
  async fn delete_by_id(&self, table: &'static str, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let sql = format!("DELETE FROM {table} WHERE id = ?1");

    let changed: usize = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params![id_str])?))
      .await?;
    Ok(changed > 0)
  }
}

impl Repository for SqliteStore {
  type Error = Error;
}

// ─── Users ───────────────────────────────────────────────────────────────────

impl UserRepository for SqliteStore {
  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawUser::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_by_external_id(
    &self,
    external_id: String,
  ) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE external_id = ?1");

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![external_id], RawUser::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      id:           Uuid::new_v4(),
      external_id:  input.external_id,
      email:        input.email,
      display_name: input.display_name,
      avatar_url:   input.avatar_url,
      created_at:   Utc::now(),
    };

    let id_str       = encode_uuid(user.id);
    let external_id  = user.external_id.clone();
    let email        = user.email.clone();
    let display_name = user.display_name.clone();
    let avatar_url   = user.avatar_url.clone();
    let at_str       = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (id, external_id, email, display_name, avatar_url, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, external_id, email, display_name, avatar_url, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }
}

// ─── Interviews ──────────────────────────────────────────────────────────────

impl InterviewRepository for SqliteStore {
  async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE id = ?1");

    let raw: Option<RawInterview> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawInterview::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawInterview::into_interview).transpose()
  }

  async fn list_interviews_by_user(
    &self,
    owner_user_id: Uuid,
  ) -> Result<Vec<Interview>> {
    let user_id_str = encode_uuid(owner_user_id);
    let sql = format!(
      "SELECT {INTERVIEW_COLUMNS} FROM interviews
       WHERE user_id = ?1
       ORDER BY created_at ASC, rowid ASC"
    );

    let raws: Vec<RawInterview> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![user_id_str], RawInterview::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInterview::into_interview).collect()
  }

  async fn create_interview(&self, input: NewInterview) -> Result<Interview> {
    let now = Utc::now();
    let interview = Interview {
      id:            Uuid::new_v4(),
      owner_user_id: input.owner_user_id,
      title:         input.title,
      description:   input.description,
      created_at:    now,
      updated_at:    now,
    };

    let id_str      = encode_uuid(interview.id);
    let user_id_str = encode_uuid(interview.owner_user_id);
    let title       = interview.title.clone();
    let description = interview.description.clone();
    let at_str      = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO interviews (id, user_id, title, description, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![id_str, user_id_str, title, description, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(interview)
  }

  async fn update_interview(
    &self,
    id: Uuid,
    patch: InterviewPatch,
  ) -> Result<Option<Interview>> {
    let id_str          = encode_uuid(id);
    let set_description = patch.description.is_some();
    let description     = patch.description.flatten();
    let title           = patch.title;
    let at_str          = encode_dt(Utc::now());
    let sql = format!(
      "UPDATE interviews
          SET title       = COALESCE(?2, title),
              description = CASE WHEN ?3 THEN ?4 ELSE description END,
              updated_at  = ?5
        WHERE id = ?1
       RETURNING {INTERVIEW_COLUMNS}"
    );

    let raw: Option<RawInterview> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![id_str, title, set_description, description, at_str],
              RawInterview::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawInterview::into_interview).transpose()
  }

  async fn delete_interview(&self, id: Uuid) -> Result<bool> {
    self.delete_by_id("interviews", id).await
  }
}

// ─── Documents ───────────────────────────────────────────────────────────────

impl DocumentRepository for SqliteStore {
  async fn get_document(&self, id: Uuid) -> Result<Option<Document>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1");

    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawDocument::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDocument::into_document).transpose()
  }

  async fn list_documents_by_interview(
    &self,
    interview_id: Uuid,
  ) -> Result<Vec<Document>> {
    let interview_id_str = encode_uuid(interview_id);
    let sql = format!(
      "SELECT {DOCUMENT_COLUMNS} FROM documents
       WHERE interview_id = ?1
       ORDER BY created_at ASC, rowid ASC"
    );

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![interview_id_str], RawDocument::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }

  async fn create_document(&self, input: NewDocument) -> Result<Document> {
    let now = Utc::now();
    let document = Document {
      id:           Uuid::new_v4(),
      interview_id: input.interview_id,
      title:        input.title,
      content:      input.content,
      created_at:   now,
      updated_at:   now,
    };

    let id_str           = encode_uuid(document.id);
    let interview_id_str = encode_uuid(document.interview_id);
    let title            = document.title.clone();
    let content          = document.content.clone();
    let at_str           = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (id, interview_id, title, content, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![id_str, interview_id_str, title, content, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(document)
  }

  async fn update_document(
    &self,
    id: Uuid,
    patch: DocumentPatch,
  ) -> Result<Option<Document>> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(Utc::now());
    let sql = format!(
      "UPDATE documents
          SET title      = COALESCE(?2, title),
              content    = COALESCE(?3, content),
              updated_at = ?4
        WHERE id = ?1
       RETURNING {DOCUMENT_COLUMNS}"
    );

    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![id_str, patch.title, patch.content, at_str],
              RawDocument::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDocument::into_document).transpose()
  }

  async fn delete_document(&self, id: Uuid) -> Result<bool> {
    self.delete_by_id("documents", id).await
  }
}

// ─── Takes ───────────────────────────────────────────────────────────────────

impl TakeRepository for SqliteStore {
  async fn get_take(&self, id: Uuid) -> Result<Option<Take>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {TAKE_COLUMNS} FROM takes WHERE id = ?1");

    let raw: Option<RawTake> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawTake::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawTake::into_take).transpose()
  }

  async fn list_takes_by_interview(&self, interview_id: Uuid) -> Result<Vec<Take>> {
    let interview_id_str = encode_uuid(interview_id);
    let sql = format!(
      "SELECT {TAKE_COLUMNS} FROM takes
       WHERE interview_id = ?1
       ORDER BY created_at ASC, rowid ASC"
    );

    let raws: Vec<RawTake> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![interview_id_str], RawTake::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTake::into_take).collect()
  }

  async fn create_take(&self, input: NewTake) -> Result<Take> {
    let now = Utc::now();
    let take = Take {
      id:           Uuid::new_v4(),
      interview_id: input.interview_id,
      stage:        input.stage,
      created_at:   now,
      updated_at:   now,
    };

    let id_str           = encode_uuid(take.id);
    let interview_id_str = encode_uuid(take.interview_id);
    let stage            = take.stage.as_str();
    let at_str           = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO takes (id, interview_id, stage, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)",
          rusqlite::params![id_str, interview_id_str, stage, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(take)
  }

  async fn update_take_stage(
    &self,
    id: Uuid,
    stage: TakeStage,
  ) -> Result<Option<Take>> {
    let id_str    = encode_uuid(id);
    let stage_str = stage.as_str();
    let at_str    = encode_dt(Utc::now());
    let sql = format!(
      "UPDATE takes SET stage = ?2, updated_at = ?3
        WHERE id = ?1
       RETURNING {TAKE_COLUMNS}"
    );

    let raw: Option<RawTake> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![id_str, stage_str, at_str],
              RawTake::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawTake::into_take).transpose()
  }
}

// ─── Messages ────────────────────────────────────────────────────────────────

impl MessageRepository for SqliteStore {
  async fn list_messages_by_take(&self, take_id: Uuid) -> Result<Vec<Message>> {
    let take_id_str = encode_uuid(take_id);
    let sql = format!(
      "SELECT {MESSAGE_COLUMNS} FROM messages
       WHERE take_id = ?1
       ORDER BY created_at ASC, rowid ASC"
    );

    let raws: Vec<RawMessage> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![take_id_str], RawMessage::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMessage::into_message).collect()
  }

  async fn create_message(&self, input: NewMessage) -> Result<Message> {
    let message = Message {
      id:                   Uuid::new_v4(),
      take_id:              input.take_id,
      role:                 input.role,
      content:              input.content,
      enabled_document_ids: input.enabled_document_ids,
      created_at:           Utc::now(),
    };

    let id_str      = encode_uuid(message.id);
    let take_id_str = encode_uuid(message.take_id);
    let role        = message.role.as_str();
    let content     = message.content.clone();
    let ids_json    = encode_uuid_list(&message.enabled_document_ids)?;
    let at_str      = encode_dt(message.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO messages (id, take_id, role, content, enabled_document_ids, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, take_id_str, role, content, ids_json, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(message)
  }
}
