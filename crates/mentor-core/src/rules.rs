//! Transition rules of the two-level mentor hierarchy.
//!
//! Each check takes the state as it stood immediately before the mutation and
//! either approves the whole transition or names the reason it is refused.
//! Backends look up the records a check needs, call it, and only then write;
//! none of these functions touch storage.

use uuid::Uuid;

use crate::{
  Error, Result,
  person::{Person, Role},
};

/// Trim `name` and reject it if nothing is left.
pub fn normalize_name(name: &str) -> Result<&str> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return Err(Error::Validation { field: "name", reason: "must not be empty" });
  }
  Ok(trimmed)
}

/// Approve changing `person` to `to`, given how many people currently name
/// `person` as their mentor.
///
/// An unchanged role is always approved.
pub fn check_role_change(
  person: &Person,
  to: Role,
  mentee_count: usize,
) -> Result<()> {
  match (person.role, to) {
    (from, to) if from == to => Ok(()),
    (Role::Student, Role::Teacher) if person.mentor_id.is_some() => {
      Err(Error::InvalidTransition {
        id: person.id,
        from: Role::Student,
        to,
        reason: "a student with a mentor cannot become a teacher",
      })
    }
    (Role::Teacher, Role::Student) if mentee_count > 0 => {
      Err(Error::InvalidTransition {
        id: person.id,
        from: Role::Teacher,
        to,
        reason: "a teacher with mentees cannot become a student",
      })
    }
    _ => Ok(()),
  }
}

/// Approve pointing `student` at `mentor`, or clearing its link when
/// `mentor` is `None`.
///
/// The caller rejects self links with [`check_not_self`] before resolving the
/// mentor id, and reports a missing mentor as [`Error::NotFound`] itself.
pub fn check_mentor_link(student: &Person, mentor: Option<&Person>) -> Result<()> {
  if !student.is_student() {
    return Err(Error::InvalidRole {
      id:     student.id,
      reason: "only a student can have a mentor",
    });
  }

  let Some(mentor) = mentor else {
    return Ok(());
  };

  if !mentor.is_teacher() {
    return Err(Error::InvalidRole {
      id:     mentor.id,
      reason: "a mentor must be a teacher",
    });
  }
  if mentor.mentor_id.is_some() {
    return Err(Error::InvalidRole {
      id:     mentor.id,
      reason: "a mentor cannot have a mentor of its own",
    });
  }
  Ok(())
}

/// Reject `mentor_id` pointing at the student itself. This is the only place
/// a self link is detected, so it must run before the mentor is looked up.
pub fn check_not_self(student_id: Uuid, mentor_id: Option<Uuid>) -> Result<()> {
  if mentor_id == Some(student_id) {
    return Err(Error::SelfOrCycle(student_id));
  }
  Ok(())
}
