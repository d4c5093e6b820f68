//! Request extractors whose rejections render as [`ApiError`] bodies.
//!
//! axum's own `Json`, `Path` and `Query` reject with plain text (and 422 for
//! bodies that parse but do not fit the target type). These wrappers keep the
//! `{"error","kind"}` shape and answer every malformed request with 400.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// A JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Path parameters, e.g. the `{id}` segment.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParams<T>(pub T);

/// Query-string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);
