//! [`Roster`]: the in-memory hierarchy engine.
//!
//! Every mutation validates against the current state through [`rules`] and
//! only then writes, so a rejected call leaves the roster untouched.

use uuid::Uuid;

use crate::{
  Error, Result,
  person::{Person, Role, TeacherWithMentees},
  query, rules,
  subject::Subject,
};

/// All people and subjects, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
  people:   Vec<Person>,
  subjects: Vec<Subject>,
}

impl Roster {
  pub fn new() -> Self { Self::default() }

  pub fn people(&self) -> &[Person] { &self.people }

  pub fn get(&self, id: Uuid) -> Option<&Person> {
    self.people.iter().find(|p| p.id == id)
  }

  fn index_of(&self, id: Uuid) -> Result<usize> {
    self
      .people
      .iter()
      .position(|p| p.id == id)
      .ok_or(Error::NotFound(id))
  }

  fn name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
    self
      .people
      .iter()
      .any(|p| p.name == name && Some(p.id) != except)
  }

  /// How many people name `id` as their mentor.
  pub fn mentee_count(&self, id: Uuid) -> usize {
    query::mentees_of(&self.people, id).count()
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Add a new, unassigned student.
  pub fn create(&mut self, name: &str) -> Result<Person> {
    let name = rules::normalize_name(name)?;
    if self.name_taken(name, None) {
      return Err(Error::DuplicateName(name.to_owned()));
    }
    let person = Person::new(name);
    self.people.push(person.clone());
    Ok(person)
  }

  pub fn rename(&mut self, id: Uuid, name: &str) -> Result<Person> {
    let idx = self.index_of(id)?;
    let name = rules::normalize_name(name)?;
    if self.name_taken(name, Some(id)) {
      return Err(Error::DuplicateName(name.to_owned()));
    }
    self.people[idx].name = name.to_owned();
    Ok(self.people[idx].clone())
  }

  /// Remove a person. Anyone it mentored is left without a mentor.
  pub fn delete(&mut self, id: Uuid) -> Result<Person> {
    let idx = self.index_of(id)?;
    let removed = self.people.remove(idx);
    for p in self.people.iter_mut().filter(|p| p.is_mentee_of(id)) {
      p.mentor_id = None;
    }
    Ok(removed)
  }

  pub fn set_role(&mut self, id: Uuid, role: Role) -> Result<Person> {
    let idx = self.index_of(id)?;
    rules::check_role_change(&self.people[idx], role, self.mentee_count(id))?;

    let person = &mut self.people[idx];
    person.role = role;
    if role == Role::Teacher {
      person.mentor_id = None;
    }
    Ok(person.clone())
  }

  /// Link `student_id` to `mentor_id`, or unlink it when `mentor_id` is
  /// `None`.
  pub fn set_mentor(
    &mut self,
    student_id: Uuid,
    mentor_id: Option<Uuid>,
  ) -> Result<Person> {
    let idx = self.index_of(student_id)?;
    let student = &self.people[idx];
    rules::check_mentor_link(student, None)?;
    rules::check_not_self(student_id, mentor_id)?;

    if let Some(mentor_id) = mentor_id {
      let mentor = self.get(mentor_id).ok_or(Error::NotFound(mentor_id))?;
      rules::check_mentor_link(student, Some(mentor))?;
    }

    let person = &mut self.people[idx];
    person.mentor_id = mentor_id;
    Ok(person.clone())
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  pub fn unassigned(&self) -> Vec<Person> {
    query::unassigned(&self.people).cloned().collect()
  }

  pub fn teachers_with_mentees(&self) -> Vec<TeacherWithMentees> {
    query::teachers_with_mentees(&self.people)
  }

  pub fn peers_of(&self, id: Uuid) -> Result<Vec<Person>> {
    Ok(
      query::peers_of(&self.people, id)?
        .into_iter()
        .cloned()
        .collect(),
    )
  }

  pub fn mentor_of(&self, id: Uuid) -> Result<Option<Person>> {
    Ok(query::mentor_of(&self.people, id)?.cloned())
  }

  pub fn mentees_of(&self, id: Uuid) -> Result<Vec<Person>> {
    self.index_of(id)?;
    Ok(query::mentees_of(&self.people, id).cloned().collect())
  }

  pub fn search_by_name(&self, needle: &str) -> Vec<Person> {
    query::search_by_name(&self.people, needle).cloned().collect()
  }

  // ── Subjects ──────────────────────────────────────────────────────────────

  pub fn subjects(&self) -> &[Subject] { &self.subjects }

  pub fn create_subject(&mut self, name: &str) -> Result<Subject> {
    let name = rules::normalize_name(name)?;
    if self.subjects.iter().any(|s| s.name == name) {
      return Err(Error::DuplicateSubject(name.to_owned()));
    }
    let subject = Subject::new(name);
    self.subjects.push(subject.clone());
    Ok(subject)
  }

  pub fn delete_subject(&mut self, id: Uuid) -> Result<Subject> {
    let idx = self
      .subjects
      .iter()
      .position(|s| s.id == id)
      .ok_or(Error::SubjectNotFound(id))?;
    Ok(self.subjects.remove(idx))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn teacher(r: &mut Roster, name: &str) -> Person {
    let p = r.create(name).unwrap();
    r.set_role(p.id, Role::Teacher).unwrap()
  }

  // ── Create ────────────────────────────────────────────────────────────────

  #[test]
  fn create_starts_as_unassigned_student() {
    let mut r = Roster::new();
    let p = r.create("  Alice ").unwrap();
    assert_eq!(p.name, "Alice");
    assert_eq!(p.role, Role::Student);
    assert_eq!(p.mentor_id, None);
    assert_eq!(r.get(p.id), Some(&p));
  }

  #[test]
  fn create_twice_is_a_duplicate() {
    let mut r = Roster::new();
    r.create("Alice").unwrap();
    assert_eq!(r.create("Alice"), Err(Error::DuplicateName("Alice".into())));
    // Uniqueness is case-sensitive.
    r.create("alice").unwrap();
    assert_eq!(r.people().len(), 2);
  }

  #[test]
  fn create_rejects_blank_names() {
    let mut r = Roster::new();
    assert!(matches!(r.create("   "), Err(Error::Validation { .. })));
    assert!(r.people().is_empty());
  }

  #[test]
  fn rename_keeps_names_unique() {
    let mut r = Roster::new();
    let a = r.create("Alice").unwrap();
    r.create("Bob").unwrap();
    assert_eq!(r.rename(a.id, "Bob"), Err(Error::DuplicateName("Bob".into())));
    assert_eq!(r.rename(a.id, "Alice").unwrap().name, "Alice");
    assert_eq!(r.rename(a.id, "Alicia").unwrap().name, "Alicia");
  }

  // ── Roles ─────────────────────────────────────────────────────────────────

  #[test]
  fn promote_then_link_as_target_fails() {
    let mut r = Roster::new();
    let d = r.create("D").unwrap();
    let t = teacher(&mut r, "T");
    let d = r.set_role(d.id, Role::Teacher).unwrap();
    assert!(d.is_teacher());
    assert!(matches!(
      r.set_mentor(d.id, Some(t.id)),
      Err(Error::InvalidRole { id, .. }) if id == d.id
    ));
  }

  #[test]
  fn student_with_mentor_cannot_be_promoted() {
    let mut r = Roster::new();
    let t = teacher(&mut r, "T");
    let s = r.create("S").unwrap();
    r.set_mentor(s.id, Some(t.id)).unwrap();

    assert!(matches!(
      r.set_role(s.id, Role::Teacher),
      Err(Error::InvalidTransition { .. })
    ));
    assert_eq!(r.get(s.id).unwrap().role, Role::Student);
  }

  #[test]
  fn teacher_demotion_depends_on_mentees() {
    let mut r = Roster::new();
    let t = teacher(&mut r, "T");
    let s = r.create("S").unwrap();
    r.set_mentor(s.id, Some(t.id)).unwrap();

    assert!(matches!(
      r.set_role(t.id, Role::Student),
      Err(Error::InvalidTransition { from: Role::Teacher, .. })
    ));

    r.set_mentor(s.id, None).unwrap();
    let t = r.set_role(t.id, Role::Student).unwrap();
    assert!(t.is_student());
    assert_eq!(t.mentor_id, None);
  }

  #[test]
  fn set_role_unknown_id() {
    let mut r = Roster::new();
    let id = Uuid::new_v4();
    assert_eq!(r.set_role(id, Role::Teacher), Err(Error::NotFound(id)));
  }

  // ── Mentor links ──────────────────────────────────────────────────────────

  #[test]
  fn student_cannot_mentor() {
    let mut r = Roster::new();
    let a = r.create("A").unwrap();
    let b = r.create("B").unwrap();
    assert!(matches!(
      r.set_mentor(a.id, Some(b.id)),
      Err(Error::InvalidRole { id, .. }) if id == b.id
    ));
    assert_eq!(r.get(a.id).unwrap().mentor_id, None);
  }

  #[test]
  fn self_link_is_refused() {
    let mut r = Roster::new();
    let a = r.create("A").unwrap();
    assert_eq!(r.set_mentor(a.id, Some(a.id)), Err(Error::SelfOrCycle(a.id)));
  }

  #[test]
  fn missing_mentor_is_not_found() {
    let mut r = Roster::new();
    let a = r.create("A").unwrap();
    let ghost = Uuid::new_v4();
    assert_eq!(r.set_mentor(a.id, Some(ghost)), Err(Error::NotFound(ghost)));
  }

  #[test]
  fn unassign_is_idempotent() {
    let mut r = Roster::new();
    let a = r.create("A").unwrap();
    r.set_mentor(a.id, None).unwrap();
    r.set_mentor(a.id, None).unwrap();
  }

  // ── Delete ────────────────────────────────────────────────────────────────

  #[test]
  fn deleting_a_teacher_orphans_mentees() {
    let mut r = Roster::new();
    let a = teacher(&mut r, "A");
    let b = r.create("B").unwrap();
    let c = r.create("C").unwrap();
    r.set_mentor(b.id, Some(a.id)).unwrap();
    r.set_mentor(c.id, Some(a.id)).unwrap();

    let peers = r.peers_of(b.id).unwrap();
    assert_eq!(peers.len(), 1);
    assert_eq!(peers[0].id, c.id);

    r.delete(a.id).unwrap();
    let unassigned = r.unassigned();
    assert_eq!(
      unassigned.iter().map(|p| p.id).collect::<Vec<_>>(),
      [b.id, c.id]
    );
    assert!(unassigned.iter().all(|p| p.mentor_id.is_none()));
    assert_eq!(r.delete(a.id), Err(Error::NotFound(a.id)));
  }

  #[test]
  fn mentees_of_requires_existing_person() {
    let r = Roster::new();
    let id = Uuid::new_v4();
    assert_eq!(r.mentees_of(id), Err(Error::NotFound(id)));
  }

  // ── Subjects ──────────────────────────────────────────────────────────────

  #[test]
  fn subjects_are_unique_and_deletable() {
    let mut r = Roster::new();
    let math = r.create_subject("Math").unwrap();
    assert_eq!(
      r.create_subject(" Math "),
      Err(Error::DuplicateSubject("Math".into()))
    );
    assert_eq!(r.delete_subject(math.id).unwrap().name, "Math");
    assert_eq!(r.delete_subject(math.id), Err(Error::SubjectNotFound(math.id)));
    assert!(r.subjects().is_empty());
  }
}
