//! Subject: a named entry in the course catalog.
//!
//! Subjects live beside the person hierarchy and never take part in it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
  pub id:         Uuid,
  /// Trimmed, non-empty, unique across the catalog.
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

impl Subject {
  pub fn new(name: impl Into<String>) -> Self {
    Self { id: Uuid::new_v4(), name: name.into(), created_at: Utc::now() }
  }
}
