use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::auth::access::{authorize, Identity};
use crate::errors::{run_blocking, AppError};
use crate::models::local_now;
use crate::state::AppState;

/// Authenticated caller, resolved from the `Authorization` header.
///
/// The header carries the raw token; a `Bearer ` prefix is tolerated. Roles other
/// than HR and manager are rejected here, before any handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

/// Extracts the token from the `Authorization` header, if any.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?.trim_start();
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = token_from_headers(&parts.headers).ok_or(AppError::MissingToken)?;
        let store = state.store.clone();
        let identity = run_blocking(move || {
            let tokens = store.load_tokens()?;
            Ok(authorize(&tokens, &token, None, local_now())?)
        })
        .await?;
        Ok(AuthUser(identity))
    }
}
