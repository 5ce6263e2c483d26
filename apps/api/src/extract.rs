//! Request extractors whose rejections go through `AppError`, so malformed
//! bodies and path segments get the same JSON error body as everything else.

use axum::extract::{FromRequest, FromRequestParts, Json, Path};

use crate::errors::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Typed path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
