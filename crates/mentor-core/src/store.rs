//! The `RosterStore` trait.
//!
//! The trait is implemented by storage backends ([`crate::memory::MemoryStore`],
//! `mentor-store-sqlite`). Higher layers (`mentor-api`, `mentor-server`)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  error::DomainError,
  person::{Person, Role, TeacherWithMentees},
  subject::Subject,
};

/// Abstraction over a roster backend.
///
/// Each mutation is one atomic read-validate-write step: it is checked
/// against the state immediately before it and either commits fully or
/// leaves the store untouched. Rule violations surface as
/// [`crate::Error`] values reachable through [`DomainError::domain`].
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RosterStore: Send + Sync {
  type Error: std::error::Error + DomainError + Send + Sync + 'static;

  // ── People: writes ────────────────────────────────────────────────────

  /// Create an unassigned student. Fails on a blank or taken name.
  fn create_person(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Change a person's name, keeping names unique.
  fn rename_person(
    &self,
    id: Uuid,
    name: String,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Remove a person and clear the mentor link of everyone it mentored.
  /// Returns the removed person.
  fn delete_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Promote or demote a person.
  fn set_role(
    &self,
    id: Uuid,
    role: Role,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Point a student at a teacher, or clear its link with `None`.
  fn set_mentor(
    &self,
    student_id: Uuid,
    mentor_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  // ── People: reads ─────────────────────────────────────────────────────

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Everyone, in insertion order.
  fn list_people(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Students without a mentor.
  fn find_unassigned(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Every teacher with its (possibly empty) list of mentees.
  fn find_teachers_with_mentees(
    &self,
  ) -> impl Future<Output = Result<Vec<TeacherWithMentees>, Self::Error>> + Send + '_;

  /// The other mentees of `id`'s mentor. Fails with `NoMentor` if `id` has
  /// no mentor.
  fn peers_of(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// `id`'s mentor, or `None` if it has none.
  fn mentor_of(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Everyone whose mentor is `id`.
  fn mentees_of(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Case-insensitive substring search over names.
  fn search_by_name(
    &self,
    needle: String,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  // ── Subjects ──────────────────────────────────────────────────────────

  fn create_subject(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Subject, Self::Error>> + Send + '_;

  fn list_subjects(
    &self,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  fn delete_subject(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Subject, Self::Error>> + Send + '_;
}
