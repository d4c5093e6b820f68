//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use mentor_core::DomainError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// A roster rule refused the request.
  #[error(transparent)]
  Rejected(mentor_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error: rule violations keep their kind, anything
  /// else becomes an opaque store failure.
  pub fn store<E>(e: E) -> Self
  where
    E: DomainError + std::error::Error + Send + Sync + 'static,
  {
    match e.domain() {
      Some(rejection) => Self::Rejected(rejection.clone()),
      None => Self::Store(Box::new(e)),
    }
  }

  fn status(&self) -> StatusCode {
    use mentor_core::Error as E;

    match self {
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Rejected(e) => match e {
        E::NotFound(_) | E::SubjectNotFound(_) => StatusCode::NOT_FOUND,
        E::Validation { .. } => StatusCode::BAD_REQUEST,
        E::DuplicateName(_)
        | E::DuplicateSubject(_)
        | E::InvalidTransition { .. }
        | E::InvalidRole { .. }
        | E::SelfOrCycle(_)
        | E::NoMentor(_) => StatusCode::CONFLICT,
      },
      Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn kind(&self) -> &'static str {
    match self {
      Self::NotFound(_) => "not_found",
      Self::BadRequest(_) => "bad_request",
      Self::Rejected(e) => e.kind(),
      Self::Store(_) => "store",
    }
  }
}

// ─── Extractor rejections ─────────────────────────────────────────────────────

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { Self::BadRequest(r.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self { Self::BadRequest(r.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { Self::BadRequest(r.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    let body = json!({ "error": self.to_string(), "kind": self.kind() });
    (status, Json(body)).into_response()
  }
}
