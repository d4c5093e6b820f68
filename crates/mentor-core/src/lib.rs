//! Core types and the hierarchy engine for the mentorship roster.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod memory;
pub mod person;
pub mod query;
pub mod roster;
pub mod rules;
pub mod store;
pub mod subject;

pub use error::{DomainError, Error, Result};
