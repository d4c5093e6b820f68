//! Handlers for `/subjects` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/subjects` | Insertion order |
//! | `POST`   | `/subjects` | Body: `{"name":"..."}` |
//! | `DELETE` | `/subjects/:id` | 204, or 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use mentor_core::{store::RosterStore, subject::Subject};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{JsonBody, PathParams},
};

/// `GET /subjects`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Subject>>, ApiError>
where
  S: RosterStore,
{
  let subjects = store.list_subjects().await.map_err(ApiError::store)?;
  Ok(Json(subjects))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /subjects`, body: `{"name":"..."}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  let subject = store
    .create_subject(body.name)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(id = %subject.id, name = %subject.name, "subject created");
  Ok((StatusCode::CREATED, Json(subject)))
}

/// `DELETE /subjects/:id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  PathParams(id): PathParams<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RosterStore,
{
  store.delete_subject(id).await.map_err(ApiError::store)?;
  tracing::info!(%id, "subject deleted");
  Ok(StatusCode::NO_CONTENT)
}
