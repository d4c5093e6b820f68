//! Handlers for `/users` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users` | Optional `?name=` substring search; 404 when nothing matches |
//! | `POST`   | `/users` | Body: `{"name":"..."}`; returns 201 + new student |
//! | `GET`    | `/users/unassigned` | Students without a mentor |
//! | `GET`    | `/users/teachers` | Teachers with nested `mentees` |
//! | `GET`    | `/users/:id` | 404 if not found |
//! | `PUT`    | `/users/:id` | Body: exactly one of `name`, `role`/`userType`, `mentorId` |
//! | `DELETE` | `/users/:id` | 204; mentees of a deleted teacher are unassigned |
//! | `GET`    | `/users/:id/peers` | Fellow mentees of the same mentor |
//! | `GET`    | `/users/:id/mentor` | 404 if the person has no mentor |
//! | `GET`    | `/users/:id/mentees` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use mentor_core::{
  person::{Person, Role, TeacherWithMentees},
  store::RosterStore,
};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{JsonBody, PathParams, QueryParams},
};

// ─── Response shapes ──────────────────────────────────────────────────────────

/// A person as rendered to clients: the stored fields plus the role flags.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonView {
  #[serde(flatten)]
  pub person:     Person,
  pub is_student: bool,
  pub is_teacher: bool,
}

impl From<Person> for PersonView {
  fn from(person: Person) -> Self {
    Self {
      is_student: person.is_student(),
      is_teacher: person.is_teacher(),
      person,
    }
  }
}

/// A teacher with its mentees embedded.
#[derive(Debug, Serialize)]
pub struct TeacherView {
  #[serde(flatten)]
  pub teacher: PersonView,
  pub mentees: Vec<PersonView>,
}

impl From<TeacherWithMentees> for TeacherView {
  fn from(t: TeacherWithMentees) -> Self {
    Self {
      teacher: t.teacher.into(),
      mentees: views(t.mentees),
    }
  }
}

fn views(people: Vec<Person>) -> Vec<PersonView> {
  people.into_iter().map(PersonView::from).collect()
}

// ─── List / search ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Case-insensitive substring to match against names.
  pub name: Option<String>,
}

/// `GET /users[?name=<substring>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<PersonView>>, ApiError>
where
  S: RosterStore,
{
  let Some(needle) = params.name else {
    let people = store.list_people().await.map_err(ApiError::store)?;
    return Ok(Json(views(people)));
  };

  let hits = store
    .search_by_name(needle.clone())
    .await
    .map_err(ApiError::store)?;
  if hits.is_empty() {
    return Err(ApiError::NotFound(format!("no person matches {needle:?}")));
  }
  Ok(Json(views(hits)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /users`, body: `{"name":"..."}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  let person = store
    .create_person(body.name)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(id = %person.id, name = %person.name, "person created");
  Ok((StatusCode::CREATED, Json(PersonView::from(person))))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  PathParams(id): PathParams<Uuid>,
) -> Result<Json<PersonView>, ApiError>
where
  S: RosterStore,
{
  let person = store
    .get_person(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person.into()))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
fn nullable<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(d).map(Some)
}

/// JSON body accepted by `PUT /users/:id`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
  pub name:       Option<String>,
  #[serde(alias = "userType")]
  pub role:       Option<Role>,
  /// `null` unassigns the current mentor.
  #[serde(default, deserialize_with = "nullable")]
  pub mentor_id:  Option<Option<Uuid>>,
  /// Derived from `role`; present at all (even as `null`) means rejected.
  #[serde(default, deserialize_with = "nullable")]
  pub is_student: Option<Option<serde_json::Value>>,
  #[serde(default, deserialize_with = "nullable")]
  pub is_teacher: Option<Option<serde_json::Value>>,
}

/// The single change a `PUT` asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Change {
  Name(String),
  Role(Role),
  Mentor(Option<Uuid>),
}

impl TryFrom<UpdateBody> for Change {
  type Error = ApiError;

  fn try_from(b: UpdateBody) -> Result<Self, ApiError> {
    if b.is_student.is_some() || b.is_teacher.is_some() {
      return Err(ApiError::BadRequest(
        "isStudent and isTeacher are derived from role and cannot be set".into(),
      ));
    }

    let mut changes = [
      b.name.map(Change::Name),
      b.role.map(Change::Role),
      b.mentor_id.map(Change::Mentor),
    ]
    .into_iter()
    .flatten();

    match (changes.next(), changes.next()) {
      (Some(change), None) => Ok(change),
      (None, _) => Err(ApiError::BadRequest(
        "expected one of name, role or mentorId".into(),
      )),
      (Some(_), Some(_)) => Err(ApiError::BadRequest(
        "only one of name, role or mentorId may change per request".into(),
      )),
    }
  }
}

/// `PUT /users/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  PathParams(id): PathParams<Uuid>,
  JsonBody(body): JsonBody<UpdateBody>,
) -> Result<Json<PersonView>, ApiError>
where
  S: RosterStore,
{
  let change = Change::try_from(body)?;
  let person = match change {
    Change::Name(name) => store.rename_person(id, name).await,
    Change::Role(role) => store.set_role(id, role).await,
    Change::Mentor(mentor_id) => store.set_mentor(id, mentor_id).await,
  }
  .map_err(ApiError::store)?;

  tracing::info!(
    %id,
    role = %person.role,
    mentor_id = ?person.mentor_id,
    "person updated"
  );
  Ok(Json(person.into()))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /users/:id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  PathParams(id): PathParams<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RosterStore,
{
  let person = store.delete_person(id).await.map_err(ApiError::store)?;
  tracing::info!(%id, name = %person.name, "person deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Hierarchy queries ────────────────────────────────────────────────────────

/// `GET /users/unassigned`
pub async fn unassigned<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<PersonView>>, ApiError>
where
  S: RosterStore,
{
  let people = store.find_unassigned().await.map_err(ApiError::store)?;
  Ok(Json(views(people)))
}

/// `GET /users/teachers`
pub async fn teachers<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<TeacherView>>, ApiError>
where
  S: RosterStore,
{
  let teachers = store
    .find_teachers_with_mentees()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(teachers.into_iter().map(TeacherView::from).collect()))
}

/// `GET /users/:id/peers`
pub async fn peers<S>(
  State(store): State<Arc<S>>,
  PathParams(id): PathParams<Uuid>,
) -> Result<Json<Vec<PersonView>>, ApiError>
where
  S: RosterStore,
{
  let people = store.peers_of(id).await.map_err(ApiError::store)?;
  Ok(Json(views(people)))
}

/// `GET /users/:id/mentor`
pub async fn mentor<S>(
  State(store): State<Arc<S>>,
  PathParams(id): PathParams<Uuid>,
) -> Result<Json<PersonView>, ApiError>
where
  S: RosterStore,
{
  let mentor = store
    .mentor_of(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} has no mentor")))?;
  Ok(Json(mentor.into()))
}

/// `GET /users/:id/mentees`
pub async fn mentees<S>(
  State(store): State<Arc<S>>,
  PathParams(id): PathParams<Uuid>,
) -> Result<Json<Vec<PersonView>>, ApiError>
where
  S: RosterStore,
{
  let people = store.mentees_of(id).await.map_err(ApiError::store)?;
  Ok(Json(views(people)))
}
