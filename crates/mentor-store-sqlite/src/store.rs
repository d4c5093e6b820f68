//! [`SqliteStore`]: the SQLite implementation of [`RosterStore`].

use std::path::Path;

use rusqlite::{
  Connection, OptionalExtension as _, Params, Transaction, TransactionBehavior,
};
use uuid::Uuid;

use mentor_core::{
  person::{Person, Role, TeacherWithMentees},
  query, rules,
  store::RosterStore,
  subject::Subject,
};

use crate::{
  encode::{
    PERSON_COLUMNS, RawPerson, RawSubject, SUBJECT_COLUMNS, encode_dt,
    encode_role, encode_uuid,
  },
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A roster backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls
/// are executed one at a time on the connection's thread, and every mutation
/// additionally runs inside a `BEGIN IMMEDIATE` transaction.
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
    Ok(())
  }

  /// Run `f` on the connection thread and flatten its result.
  async fn run<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }
}

// ─── Row access ──────────────────────────────────────────────────────────────

fn immediate(conn: &mut Connection) -> Result<Transaction<'_>> {
  Ok(conn.transaction_with_behavior(TransactionBehavior::Immediate)?)
}

fn select_people<P: Params>(
  conn: &Connection,
  filter: &str,
  params: P,
) -> Result<Vec<Person>> {
  let sql = format!("SELECT {PERSON_COLUMNS} FROM people {filter} ORDER BY seq");
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(params, RawPerson::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawPerson::into_person).collect()
}

fn load_person(conn: &Connection, id: Uuid) -> Result<Option<Person>> {
  conn
    .query_row(
      &format!("SELECT {PERSON_COLUMNS} FROM people WHERE person_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawPerson::from_row,
    )
    .optional()?
    .map(RawPerson::into_person)
    .transpose()
}

fn require_person(conn: &Connection, id: Uuid) -> Result<Person> {
  Ok(load_person(conn, id)?.ok_or(mentor_core::Error::NotFound(id))?)
}

fn name_taken(conn: &Connection, name: &str, except: Option<Uuid>) -> Result<bool> {
  let except = except.map(encode_uuid);
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM people
         WHERE name = ?1 AND (?2 IS NULL OR person_id != ?2)",
        rusqlite::params![name, except],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

fn mentee_count(conn: &Connection, id: Uuid) -> Result<usize> {
  let count: i64 = conn.query_row(
    "SELECT COUNT(*) FROM people WHERE mentor_id = ?1",
    rusqlite::params![encode_uuid(id)],
    |r| r.get(0),
  )?;
  Ok(count as usize)
}

fn select_subjects(conn: &Connection) -> Result<Vec<Subject>> {
  let sql = format!("SELECT {SUBJECT_COLUMNS} FROM subjects ORDER BY seq");
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map([], RawSubject::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawSubject::into_subject).collect()
}

// ─── Mutations ───────────────────────────────────────────────────────────────
//
// Each runs in one immediate transaction: load the rows the rule needs,
// check, write, commit. Returning early drops the transaction, which rolls
// it back.

fn insert_person(conn: &mut Connection, name: &str) -> Result<Person> {
  let name = rules::normalize_name(name)?;
  let tx = immediate(conn)?;
  if name_taken(&tx, name, None)? {
    return Err(mentor_core::Error::DuplicateName(name.to_owned()).into());
  }

  let person = Person::new(name);
  tx.execute(
    "INSERT INTO people (person_id, name, role, mentor_id, created_at)
     VALUES (?1, ?2, ?3, NULL, ?4)",
    rusqlite::params![
      encode_uuid(person.id),
      person.name,
      encode_role(person.role),
      encode_dt(person.created_at),
    ],
  )?;
  tx.commit()?;
  Ok(person)
}

fn update_name(conn: &mut Connection, id: Uuid, name: &str) -> Result<Person> {
  let tx = immediate(conn)?;
  let mut person = require_person(&tx, id)?;
  let name = rules::normalize_name(name)?;
  if name_taken(&tx, name, Some(id))? {
    return Err(mentor_core::Error::DuplicateName(name.to_owned()).into());
  }

  tx.execute(
    "UPDATE people SET name = ?2 WHERE person_id = ?1",
    rusqlite::params![encode_uuid(id), name],
  )?;
  tx.commit()?;
  person.name = name.to_owned();
  Ok(person)
}

fn remove_person(conn: &mut Connection, id: Uuid) -> Result<Person> {
  let tx = immediate(conn)?;
  let person = require_person(&tx, id)?;
  let id_str = encode_uuid(id);

  tx.execute(
    "UPDATE people SET mentor_id = NULL WHERE mentor_id = ?1",
    rusqlite::params![id_str],
  )?;
  tx.execute(
    "DELETE FROM people WHERE person_id = ?1",
    rusqlite::params![id_str],
  )?;
  tx.commit()?;
  Ok(person)
}

fn update_role(conn: &mut Connection, id: Uuid, role: Role) -> Result<Person> {
  let tx = immediate(conn)?;
  let mut person = require_person(&tx, id)?;
  rules::check_role_change(&person, role, mentee_count(&tx, id)?)?;

  if person.role != role {
    person.role = role;
    if role == Role::Teacher {
      person.mentor_id = None;
    }
    tx.execute(
      "UPDATE people SET role = ?2, mentor_id = ?3 WHERE person_id = ?1",
      rusqlite::params![
        encode_uuid(id),
        encode_role(role),
        person.mentor_id.map(encode_uuid),
      ],
    )?;
  }
  tx.commit()?;
  Ok(person)
}

fn update_mentor(
  conn: &mut Connection,
  student_id: Uuid,
  mentor_id: Option<Uuid>,
) -> Result<Person> {
  let tx = immediate(conn)?;
  let mut student = require_person(&tx, student_id)?;
  rules::check_mentor_link(&student, None)?;
  rules::check_not_self(student_id, mentor_id)?;
  if let Some(mentor_id) = mentor_id {
    let mentor = require_person(&tx, mentor_id)?;
    rules::check_mentor_link(&student, Some(&mentor))?;
  }

  tx.execute(
    "UPDATE people SET mentor_id = ?2 WHERE person_id = ?1",
    rusqlite::params![encode_uuid(student_id), mentor_id.map(encode_uuid)],
  )?;
  tx.commit()?;
  student.mentor_id = mentor_id;
  Ok(student)
}

fn insert_subject(conn: &mut Connection, name: &str) -> Result<Subject> {
  let name = rules::normalize_name(name)?;
  let tx = immediate(conn)?;
  let taken = tx
    .query_row(
      "SELECT 1 FROM subjects WHERE name = ?1",
      rusqlite::params![name],
      |_| Ok(true),
    )
    .optional()?
    .unwrap_or(false);
  if taken {
    return Err(mentor_core::Error::DuplicateSubject(name.to_owned()).into());
  }

  let subject = Subject::new(name);
  tx.execute(
    "INSERT INTO subjects (subject_id, name, created_at) VALUES (?1, ?2, ?3)",
    rusqlite::params![
      encode_uuid(subject.id),
      subject.name,
      encode_dt(subject.created_at),
    ],
  )?;
  tx.commit()?;
  Ok(subject)
}

fn remove_subject(conn: &mut Connection, id: Uuid) -> Result<Subject> {
  let tx = immediate(conn)?;
  let raw = tx
    .query_row(
      &format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE subject_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawSubject::from_row,
    )
    .optional()?
    .ok_or(mentor_core::Error::SubjectNotFound(id))?;
  let subject = raw.into_subject()?;

  tx.execute(
    "DELETE FROM subjects WHERE subject_id = ?1",
    rusqlite::params![encode_uuid(id)],
  )?;
  tx.commit()?;
  Ok(subject)
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = crate::Error;

  // ── People: writes ────────────────────────────────────────────────────────

  async fn create_person(&self, name: String) -> Result<Person> {
    self.run(move |conn| insert_person(conn, &name)).await
  }

  async fn rename_person(&self, id: Uuid, name: String) -> Result<Person> {
    self.run(move |conn| update_name(conn, id, &name)).await
  }

  async fn delete_person(&self, id: Uuid) -> Result<Person> {
    self.run(move |conn| remove_person(conn, id)).await
  }

  async fn set_role(&self, id: Uuid, role: Role) -> Result<Person> {
    self.run(move |conn| update_role(conn, id, role)).await
  }

  async fn set_mentor(
    &self,
    student_id: Uuid,
    mentor_id:  Option<Uuid>,
  ) -> Result<Person> {
    self.run(move |conn| update_mentor(conn, student_id, mentor_id)).await
  }

  // ── People: reads ─────────────────────────────────────────────────────────

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    self.run(move |conn| load_person(conn, id)).await
  }

  async fn list_people(&self) -> Result<Vec<Person>> {
    self.run(|conn| select_people(conn, "", [])).await
  }

  async fn find_unassigned(&self) -> Result<Vec<Person>> {
    self
      .run(|conn| {
        select_people(
          conn,
          "WHERE role = 'STUDENT' AND mentor_id IS NULL",
          [],
        )
      })
      .await
  }

  async fn find_teachers_with_mentees(&self) -> Result<Vec<TeacherWithMentees>> {
    self
      .run(|conn| {
        let teachers = select_people(conn, "WHERE role = 'TEACHER'", [])?;
        let linked = select_people(conn, "WHERE mentor_id IS NOT NULL", [])?;
        Ok(
          teachers
            .into_iter()
            .map(|teacher| TeacherWithMentees {
              mentees: linked
                .iter()
                .filter(|p| p.is_mentee_of(teacher.id))
                .cloned()
                .collect(),
              teacher,
            })
            .collect(),
        )
      })
      .await
  }

  async fn peers_of(&self, id: Uuid) -> Result<Vec<Person>> {
    self
      .run(move |conn| {
        let person = require_person(conn, id)?;
        let mentor_id =
          person.mentor_id.ok_or(mentor_core::Error::NoMentor(id))?;
        select_people(
          conn,
          "WHERE mentor_id = ?1 AND person_id != ?2",
          rusqlite::params![encode_uuid(mentor_id), encode_uuid(id)],
        )
      })
      .await
  }

  async fn mentor_of(&self, id: Uuid) -> Result<Option<Person>> {
    self
      .run(move |conn| {
        let person = require_person(conn, id)?;
        match person.mentor_id {
          Some(mentor_id) => load_person(conn, mentor_id),
          None => Ok(None),
        }
      })
      .await
  }

  async fn mentees_of(&self, id: Uuid) -> Result<Vec<Person>> {
    self
      .run(move |conn| {
        require_person(conn, id)?;
        select_people(
          conn,
          "WHERE mentor_id = ?1",
          rusqlite::params![encode_uuid(id)],
        )
      })
      .await
  }

  async fn search_by_name(&self, needle: String) -> Result<Vec<Person>> {
    // SQLite's LIKE and lower() only fold ASCII, so matching happens here.
    self
      .run(move |conn| {
        let mut people = select_people(conn, "", [])?;
        people.retain(|p| query::name_matches(&p.name, &needle));
        Ok(people)
      })
      .await
  }

  // ── Subjects ──────────────────────────────────────────────────────────────

  async fn create_subject(&self, name: String) -> Result<Subject> {
    self.run(move |conn| insert_subject(conn, &name)).await
  }

  async fn list_subjects(&self) -> Result<Vec<Subject>> {
    self.run(|conn| select_subjects(conn)).await
  }

  async fn delete_subject(&self, id: Uuid) -> Result<Subject> {
    self.run(move |conn| remove_subject(conn, id)).await
  }
}
