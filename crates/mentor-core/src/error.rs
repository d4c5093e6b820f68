//! Error types for `mentor-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::person::Role;

/// A rejected roster operation.
///
/// Every variant carries enough context (the offending id or name) for a
/// transport to build a user-facing message. The variant name, rendered in
/// snake_case via [`Error::kind`], is stable and safe to expose.
#[derive(Debug, Clone, PartialEq, Eq, Error, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Error {
  #[error("person not found: {0}")]
  NotFound(Uuid),

  #[error("a person named {0:?} already exists")]
  DuplicateName(String),

  #[error("cannot change {id} from {from} to {to}: {reason}")]
  InvalidTransition {
    id:     Uuid,
    from:   Role,
    to:     Role,
    reason: &'static str,
  },

  #[error("{id} has the wrong role for this link: {reason}")]
  InvalidRole { id: Uuid, reason: &'static str },

  #[error("{0} cannot be linked to itself")]
  SelfOrCycle(Uuid),

  #[error("{0} has no mentor")]
  NoMentor(Uuid),

  #[error("invalid {field}: {reason}")]
  Validation {
    field:  &'static str,
    reason: &'static str,
  },

  #[error("subject not found: {0}")]
  SubjectNotFound(Uuid),

  #[error("a subject named {0:?} already exists")]
  DuplicateSubject(String),
}

impl Error {
  /// Stable snake_case name of the error kind, e.g. `"invalid_transition"`.
  pub fn kind(&self) -> &'static str { self.into() }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Implemented by backend error types so callers can recover the domain
/// failure, if any, hidden inside a storage error.
pub trait DomainError {
  /// The roster rule that rejected the operation, or `None` for backend
  /// faults (I/O, corrupt rows, ...).
  fn domain(&self) -> Option<&Error>;
}

impl DomainError for Error {
  fn domain(&self) -> Option<&Error> { Some(self) }
}
