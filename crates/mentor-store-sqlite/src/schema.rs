//! SQL schema for the roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- `seq` preserves insertion order for every listing.
CREATE TABLE IF NOT EXISTS people (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id   TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL UNIQUE CHECK (length(trim(name)) > 0),
    role        TEXT NOT NULL DEFAULT 'STUDENT'
                CHECK (role IN ('STUDENT', 'TEACHER')),
    mentor_id   TEXT REFERENCES people(person_id) ON DELETE SET NULL,
    created_at  TEXT NOT NULL,            -- ISO 8601 UTC
    CHECK (role = 'STUDENT' OR mentor_id IS NULL),
    CHECK (mentor_id IS NULL OR mentor_id != person_id)
);

CREATE INDEX IF NOT EXISTS people_mentor_idx ON people(mentor_id);

CREATE TABLE IF NOT EXISTS subjects (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id  TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL UNIQUE CHECK (length(trim(name)) > 0),
    created_at  TEXT NOT NULL
);

PRAGMA user_version = 1;
";
