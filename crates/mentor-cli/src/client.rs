//! Async HTTP client wrapping the roster JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use mentor_core::{
  person::{Person, Role},
  subject::Subject,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use uuid::Uuid;

/// Connection settings for the roster API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// A teacher entry from `GET /users/teachers`.
#[derive(Debug, Deserialize)]
pub struct TeacherEntry {
  #[serde(flatten)]
  pub teacher: Person,
  pub mentees: Vec<Person>,
}

/// Async HTTP client for the roster JSON API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  /// Send `req`, turning non-success statuses into errors that carry the
  /// server's message.
  async fn send(&self, what: &str, req: RequestBuilder) -> Result<Response> {
    let resp = req.send().await.with_context(|| format!("{what} failed"))?;
    if resp.status().is_success() {
      return Ok(resp);
    }
    Err(failure(what, resp).await)
  }

  /// Like [`send`](Self::send), but a 404 is `None` rather than an error.
  async fn send_optional(
    &self,
    what: &str,
    req: RequestBuilder,
  ) -> Result<Option<Response>> {
    let resp = req.send().await.with_context(|| format!("{what} failed"))?;
    match resp.status() {
      StatusCode::NOT_FOUND => Ok(None),
      s if s.is_success() => Ok(Some(resp)),
      _ => Err(failure(what, resp).await),
    }
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    let what = format!("GET {path}");
    let resp = self.send(&what, self.client.get(self.url(path))).await?;
    resp.json().await.with_context(|| format!("deserialising {what}"))
  }

  async fn put_person(&self, id: Uuid, body: Value) -> Result<Person> {
    let what = format!("PUT /users/{id}");
    let req = self.client.put(self.url(&format!("/users/{id}"))).json(&body);
    let resp = self.send(&what, req).await?;
    resp.json().await.with_context(|| format!("deserialising {what}"))
  }

  // ── People ────────────────────────────────────────────────────────────────

  /// `GET /api/users`
  pub async fn list(&self) -> Result<Vec<Person>> { self.get_json("/users").await }

  /// `GET /api/users?name=<needle>`; an empty list when nothing matches.
  pub async fn search(&self, needle: &str) -> Result<Vec<Person>> {
    let req = self.client.get(self.url("/users")).query(&[("name", needle)]);
    match self.send_optional("GET /users?name", req).await? {
      Some(resp) => resp.json().await.context("deserialising search results"),
      None => Ok(Vec::new()),
    }
  }

  /// `POST /api/users`
  pub async fn create(&self, name: &str) -> Result<Person> {
    let req = self
      .client
      .post(self.url("/users"))
      .json(&json!({ "name": name }));
    let resp = self.send("POST /users", req).await?;
    resp.json().await.context("deserialising created person")
  }

  /// `DELETE /api/users/:id`
  pub async fn delete(&self, id: Uuid) -> Result<()> {
    let what = format!("DELETE /users/{id}");
    self
      .send(&what, self.client.delete(self.url(&format!("/users/{id}"))))
      .await?;
    Ok(())
  }

  pub async fn rename(&self, id: Uuid, name: &str) -> Result<Person> {
    self.put_person(id, json!({ "name": name })).await
  }

  pub async fn set_role(&self, id: Uuid, role: Role) -> Result<Person> {
    self.put_person(id, json!({ "role": role })).await
  }

  pub async fn set_mentor(&self, id: Uuid, mentor_id: Option<Uuid>) -> Result<Person> {
    self.put_person(id, json!({ "mentorId": mentor_id })).await
  }

  /// `GET /api/users/unassigned`
  pub async fn unassigned(&self) -> Result<Vec<Person>> {
    self.get_json("/users/unassigned").await
  }

  /// `GET /api/users/teachers`
  pub async fn teachers(&self) -> Result<Vec<TeacherEntry>> {
    self.get_json("/users/teachers").await
  }

  /// `GET /api/users/:id/peers`
  pub async fn peers(&self, id: Uuid) -> Result<Vec<Person>> {
    self.get_json(&format!("/users/{id}/peers")).await
  }

  // ── Subjects ──────────────────────────────────────────────────────────────

  /// `GET /api/subjects`
  pub async fn subjects(&self) -> Result<Vec<Subject>> {
    self.get_json("/subjects").await
  }

  /// `POST /api/subjects`
  pub async fn create_subject(&self, name: &str) -> Result<Subject> {
    let req = self
      .client
      .post(self.url("/subjects"))
      .json(&json!({ "name": name }));
    let resp = self.send("POST /subjects", req).await?;
    resp.json().await.context("deserialising created subject")
  }
}

/// Build an error from a failed response, preferring the server's `error`
/// message over the bare status.
async fn failure(what: &str, resp: Response) -> anyhow::Error {
  let status = resp.status();
  let message = resp
    .json::<Value>()
    .await
    .ok()
    .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
    .unwrap_or_else(|| status.to_string());
  anyhow!("{what} → {status}: {message}")
}
