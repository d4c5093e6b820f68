//! Person, the sole entity of the mentorship roster.
//!
//! A person is either a student or a teacher. Students may point at a teacher
//! through `mentor_id`; teachers never have a mentor. The `is_student` and
//! `is_teacher` flags are pure functions of [`Role`] and are never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of a mentor/mentee link a person may stand on.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
  #[default]
  Student,
  Teacher,
}

/// A single roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  /// Assigned at creation; never changes.
  pub id:         Uuid,
  /// Trimmed, non-empty, unique across the roster.
  pub name:       String,
  pub role:       Role,
  /// Only ever `Some` for a student, and then it names a teacher.
  pub mentor_id:  Option<Uuid>,
  pub created_at: DateTime<Utc>,
}

impl Person {
  /// A fresh student with no mentor.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      id:         Uuid::new_v4(),
      name:       name.into(),
      role:       Role::Student,
      mentor_id:  None,
      created_at: Utc::now(),
    }
  }

  pub fn is_student(&self) -> bool { self.role == Role::Student }

  pub fn is_teacher(&self) -> bool { self.role == Role::Teacher }

  /// Whether this person's mentor is `teacher_id`.
  pub fn is_mentee_of(&self, teacher_id: Uuid) -> bool {
    self.mentor_id == Some(teacher_id)
  }
}

/// A teacher paired with everyone who names it as mentor.
///
/// A teacher without mentees carries an empty list rather than being left
/// out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherWithMentees {
  pub teacher: Person,
  pub mentees: Vec<Person>,
}
