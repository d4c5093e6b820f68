//! JSON REST API for the mentorship roster.
//!
//! Exposes an axum [`Router`] backed by any [`mentor_core::store::RosterStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", mentor_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod extract;
pub mod subjects;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get},
};
use mentor_core::store::RosterStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RosterStore + 'static,
{
  Router::new()
    // People
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route("/users/unassigned", get(users::unassigned::<S>))
    .route("/users/teachers", get(users::teachers::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .put(users::update::<S>)
        .delete(users::remove::<S>),
    )
    .route("/users/{id}/peers", get(users::peers::<S>))
    .route("/users/{id}/mentor", get(users::mentor::<S>))
    .route("/users/{id}/mentees", get(users::mentees::<S>))
    // Subjects
    .route("/subjects", get(subjects::list::<S>).post(subjects::create::<S>))
    .route("/subjects/{id}", delete(subjects::remove::<S>))
    .with_state(store)
}

// ─── Router tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use mentor_core::memory::MemoryStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  fn app() -> Router {
    api_router(Arc::new(MemoryStore::new()))
  }

  async fn send(
    app:    &Router,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string())),
      None => builder.body(Body::empty()),
    }
    .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
  }

  async fn create(app: &Router, name: &str) -> String {
    let (status, body) = send(app, "POST", "/users", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_owned()
  }

  async fn put(app: &Router, id: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", &format!("/users/{id}"), Some(body)).await
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_student_view() {
    let app = app();
    let (status, body) = send(&app, "POST", "/users", Some(json!({ "name": "Moe" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Moe");
    assert_eq!(body["role"], "STUDENT");
    assert_eq!(body["isStudent"], true);
    assert_eq!(body["isTeacher"], false);
    assert!(body["mentorId"].is_null());
  }

  #[tokio::test]
  async fn duplicate_name_is_409() {
    let app = app();
    create(&app, "Alice").await;
    let (status, body) = send(&app, "POST", "/users", Some(json!({ "name": "Alice" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "duplicate_name");
  }

  #[tokio::test]
  async fn empty_name_is_400() {
    let app = app();
    let (status, body) = send(&app, "POST", "/users", Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
  }

  // ── Hierarchy ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn mentorship_round_trip() {
    let app = app();
    let a = create(&app, "A").await;
    let b = create(&app, "B").await;
    let c = create(&app, "C").await;

    let (status, body) = put(&app, &a, json!({ "userType": "TEACHER" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isTeacher"], true);

    for s in [&b, &c] {
      let (status, body) = put(&app, s, json!({ "mentorId": a })).await;
      assert_eq!(status, StatusCode::OK, "{body}");
      assert_eq!(body["mentorId"], a.as_str());
    }

    let (status, body) = send(&app, "GET", "/users/teachers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], a.as_str());
    assert_eq!(body[0]["mentees"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", &format!("/users/{b}/peers"), None).await;
    let peers: Vec<&str> = body
      .as_array()
      .unwrap()
      .iter()
      .map(|p| p["id"].as_str().unwrap())
      .collect();
    assert_eq!(peers, [c.as_str()]);

    let (_, body) = send(&app, "GET", &format!("/users/{b}/mentor"), None).await;
    assert_eq!(body["id"], a.as_str());

    let (status, body) = send(&app, "GET", &format!("/users/{a}/mentees"), None).await;
    assert_eq!(status, StatusCode::OK);
    let mentees: Vec<&str> = body
      .as_array()
      .unwrap()
      .iter()
      .map(|p| p["id"].as_str().unwrap())
      .collect();
    assert_eq!(mentees, [b.as_str(), c.as_str()]);

    let (status, body) = send(&app, "GET", &format!("/users/{b}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "B");
    assert_eq!(body["mentorId"], a.as_str());
    assert_eq!(body["isStudent"], true);

    let (status, _) = send(&app, "DELETE", &format!("/users/{a}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", "/users/unassigned", None).await;
    let unassigned = body.as_array().unwrap();
    assert_eq!(unassigned.len(), 2);
    assert!(unassigned.iter().all(|p| p["mentorId"].is_null()));
  }

  #[tokio::test]
  async fn invalid_transitions_are_409() {
    let app = app();
    let t = create(&app, "T").await;
    let s = create(&app, "S").await;
    put(&app, &t, json!({ "role": "TEACHER" })).await;
    put(&app, &s, json!({ "mentorId": t })).await;

    let (status, body) = put(&app, &t, json!({ "role": "STUDENT" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "invalid_transition");

    let (status, body) = put(&app, &s, json!({ "role": "TEACHER" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "invalid_transition");

    let other = create(&app, "Other").await;
    let (status, body) = put(&app, &other, json!({ "mentorId": s })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "invalid_role");

    // Unassign, then demotion goes through.
    let (status, body) = put(&app, &s, json!({ "mentorId": null })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["mentorId"].is_null());
    let (status, _) = put(&app, &t, json!({ "role": "STUDENT" })).await;
    assert_eq!(status, StatusCode::OK);
  }

  #[tokio::test]
  async fn malformed_updates_are_400() {
    let app = app();
    let id = create(&app, "Moe").await;

    let (status, _) = put(&app, &id, json!({ "isStudent": false })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = put(&app, &id, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = put(&app, &id, json!({ "name": "Joe", "role": "TEACHER" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = put(&app, &id, json!({ "name": "Joe" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Joe");
  }

  #[tokio::test]
  async fn peers_without_mentor_is_409() {
    let app = app();
    let id = create(&app, "Zed").await;
    let (status, body) = send(&app, "GET", &format!("/users/{id}/peers"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "no_mentor");

    let (status, _) = send(&app, "GET", &format!("/users/{id}/mentor"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn unknown_and_malformed_ids() {
    let app = app();
    let ghost = uuid::Uuid::new_v4();
    let (status, _) = send(&app, "GET", &format!("/users/{ghost}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", &format!("/users/{ghost}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");

    let (status, body) = send(&app, "DELETE", "/users/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");

    let (status, body) = send(&app, "GET", "/users/not-a-uuid/peers", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");

    let (status, body) = send(&app, "DELETE", "/subjects/42", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
  }

  #[tokio::test]
  async fn unreadable_bodies_are_400_with_json_errors() {
    let app = app();
    let id = create(&app, "Moe").await;

    // Roles are upper-case only.
    let (status, body) = put(&app, &id, json!({ "role": "teacher" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
    assert!(body["error"].as_str().unwrap().contains("role"), "{body}");

    let (status, body) = put(&app, &id, json!({ "mentorId": "nobody" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");

    let (status, body) = send(&app, "POST", "/users", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");

    let (status, body) = send(&app, "POST", "/subjects", Some(json!({ "title": "Math" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");

    // No JSON content type at all.
    let (status, body) = send(&app, "POST", "/users", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");

    let (_, body) = send(&app, "GET", &format!("/users/{id}"), None).await;
    assert_eq!(body["role"], "STUDENT");
  }

  #[tokio::test]
  async fn derived_flags_are_rejected_even_when_null() {
    let app = app();
    let id = create(&app, "Moe").await;

    for flag in ["isStudent", "isTeacher"] {
      let (status, body) = put(&app, &id, json!({ flag: null, "name": "Joe" })).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{flag}: {body}");
      assert_eq!(body["kind"], "bad_request");
    }

    let (_, body) = send(&app, "GET", &format!("/users/{id}"), None).await;
    assert_eq!(body["name"], "Moe");
  }

  // ── Search ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn search_by_name() {
    let app = app();
    create(&app, "Sally").await;
    create(&app, "Wanda").await;

    let (status, body) = send(&app, "GET", "/users?name=AN", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Wanda");

    let (status, _) = send(&app, "GET", "/users?name=xyz", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    // An empty needle matches everyone.
    let (status, body) = send(&app, "GET", "/users?name=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
  }

  // ── Subjects ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn subjects_crud() {
    let app = app();
    let (status, math) = send(&app, "POST", "/subjects", Some(json!({ "name": "Math" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/subjects", Some(json!({ "name": "Math" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "duplicate_subject");

    let (_, body) = send(&app, "GET", "/subjects", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let id = math["id"].as_str().unwrap();
    let (status, _) = send(&app, "DELETE", &format!("/subjects/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &format!("/subjects/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
