//! Read-only derivations over a roster snapshot.
//!
//! These functions never mutate and hold no state; they answer questions
//! about whatever slice of people they are handed, in slice order.

use uuid::Uuid;

use crate::{
  Error, Result,
  person::{Person, TeacherWithMentees},
};

/// Students with no mentor.
pub fn unassigned(people: &[Person]) -> impl Iterator<Item = &Person> {
  people.iter().filter(|p| p.is_student() && p.mentor_id.is_none())
}

/// Everyone whose mentor is `teacher_id`.
pub fn mentees_of(
  people: &[Person],
  teacher_id: Uuid,
) -> impl Iterator<Item = &Person> {
  people.iter().filter(move |p| p.is_mentee_of(teacher_id))
}

/// Every teacher with its mentees attached.
pub fn teachers_with_mentees(people: &[Person]) -> Vec<TeacherWithMentees> {
  people
    .iter()
    .filter(|p| p.is_teacher())
    .map(|t| TeacherWithMentees {
      teacher: t.clone(),
      mentees: mentees_of(people, t.id).cloned().collect(),
    })
    .collect()
}

fn find(people: &[Person], id: Uuid) -> Result<&Person> {
  people
    .iter()
    .find(|p| p.id == id)
    .ok_or(Error::NotFound(id))
}

/// The mentor of `id`, if it has one.
pub fn mentor_of(people: &[Person], id: Uuid) -> Result<Option<&Person>> {
  let person = find(people, id)?;
  Ok(
    person
      .mentor_id
      .and_then(|mentor_id| people.iter().find(|p| p.id == mentor_id)),
  )
}

/// The other mentees of `id`'s mentor; `id` itself is never included.
///
/// Fails with [`Error::NoMentor`] when `id` has no mentor, which is always
/// the case for a teacher.
pub fn peers_of(people: &[Person], id: Uuid) -> Result<Vec<&Person>> {
  let person = find(people, id)?;
  let mentor_id = person.mentor_id.ok_or(Error::NoMentor(id))?;
  Ok(
    mentees_of(people, mentor_id)
      .filter(|p| p.id != id)
      .collect(),
  )
}

/// Case-insensitive substring test used by name search.
pub fn name_matches(name: &str, needle: &str) -> bool {
  name.to_lowercase().contains(&needle.to_lowercase())
}

/// People whose name contains `needle`, ignoring case. An empty needle
/// matches everyone.
pub fn search_by_name<'a>(
  people: &'a [Person],
  needle: &'a str,
) -> impl Iterator<Item = &'a Person> {
  people.iter().filter(move |p| name_matches(&p.name, needle))
}
