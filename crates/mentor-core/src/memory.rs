//! [`MemoryStore`], a [`RosterStore`] holding a [`Roster`] in process memory.
//!
//! Every operation takes the lock for its whole read-validate-write step, so
//! concurrent callers are serialised and never observe a half-applied change.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::{
  Error,
  person::{Person, Role, TeacherWithMentees},
  roster::Roster,
  store::RosterStore,
  subject::Subject,
};

/// Cloning is cheap; clones share the same roster.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  roster: Arc<RwLock<Roster>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn read(&self) -> RwLockReadGuard<'_, Roster> {
    self.roster.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write(&self) -> RwLockWriteGuard<'_, Roster> {
    self.roster.write().unwrap_or_else(PoisonError::into_inner)
  }
}

impl RosterStore for MemoryStore {
  type Error = Error;

  async fn create_person(&self, name: String) -> Result<Person, Error> {
    self.write().create(&name)
  }

  async fn rename_person(&self, id: Uuid, name: String) -> Result<Person, Error> {
    self.write().rename(id, &name)
  }

  async fn delete_person(&self, id: Uuid) -> Result<Person, Error> {
    self.write().delete(id)
  }

  async fn set_role(&self, id: Uuid, role: Role) -> Result<Person, Error> {
    self.write().set_role(id, role)
  }

  async fn set_mentor(
    &self,
    student_id: Uuid,
    mentor_id: Option<Uuid>,
  ) -> Result<Person, Error> {
    self.write().set_mentor(student_id, mentor_id)
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>, Error> {
    Ok(self.read().get(id).cloned())
  }

  async fn list_people(&self) -> Result<Vec<Person>, Error> {
    Ok(self.read().people().to_vec())
  }

  async fn find_unassigned(&self) -> Result<Vec<Person>, Error> {
    Ok(self.read().unassigned())
  }

  async fn find_teachers_with_mentees(
    &self,
  ) -> Result<Vec<TeacherWithMentees>, Error> {
    Ok(self.read().teachers_with_mentees())
  }

  async fn peers_of(&self, id: Uuid) -> Result<Vec<Person>, Error> {
    self.read().peers_of(id)
  }

  async fn mentor_of(&self, id: Uuid) -> Result<Option<Person>, Error> {
    self.read().mentor_of(id)
  }

  async fn mentees_of(&self, id: Uuid) -> Result<Vec<Person>, Error> {
    self.read().mentees_of(id)
  }

  async fn search_by_name(&self, needle: String) -> Result<Vec<Person>, Error> {
    Ok(self.read().search_by_name(&needle))
  }

  async fn create_subject(&self, name: String) -> Result<Subject, Error> {
    self.write().create_subject(&name)
  }

  async fn list_subjects(&self) -> Result<Vec<Subject>, Error> {
    Ok(self.read().subjects().to_vec())
  }

  async fn delete_subject(&self, id: Uuid) -> Result<Subject, Error> {
    self.write().delete_subject(id)
  }
}
