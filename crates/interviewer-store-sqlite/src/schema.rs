//! SQL schema for the interviewer SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Takes and messages cascade from their interview. Documents do not: the
/// interview service deletes them before the interview, and the foreign key
/// refuses to orphan them. `interviews.user_id` carries no foreign key;
/// interviews can be created for any acting user id, signed in or not.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY,
    external_id   TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL,
    display_name  TEXT NOT NULL,
    avatar_url    TEXT,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS interviews (
    id            TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL,
    title         TEXT NOT NULL,
    description   TEXT,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS documents (
    id            TEXT PRIMARY KEY,
    interview_id  TEXT NOT NULL REFERENCES interviews(id),
    title         TEXT NOT NULL,
    content       TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS takes (
    id            TEXT PRIMARY KEY,
    interview_id  TEXT NOT NULL REFERENCES interviews(id) ON DELETE CASCADE,
    stage         TEXT NOT NULL DEFAULT 'pre-interview'
                  CHECK (stage IN ('pre-interview', 'interview')),
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

-- Messages are append-only.
CREATE TABLE IF NOT EXISTS messages (
    id                    TEXT PRIMARY KEY,
    take_id               TEXT NOT NULL REFERENCES takes(id) ON DELETE CASCADE,
    role                  TEXT NOT NULL CHECK (role IN ('user', 'assistant')),
    content               TEXT NOT NULL,
    enabled_document_ids  TEXT NOT NULL DEFAULT '[]',  -- JSON array of UUIDs
    created_at            TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS interviews_user_idx     ON interviews(user_id);
CREATE INDEX IF NOT EXISTS documents_interview_idx ON documents(interview_id);
CREATE INDEX IF NOT EXISTS takes_interview_idx     ON takes(interview_id);
CREATE INDEX IF NOT EXISTS messages_take_idx       ON messages(take_id, created_at);

PRAGMA user_version = 1;
";
