//! Token resolution and record-level access decisions.
//!
//! Everything here is a pure function over tables that the caller has already
//! loaded; nothing touches disk.

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::errors::AppError;
use crate::models::{AccessToken, ReviewRecord, Role};

/// The caller behind a valid token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    pub personnel_nr: u32,
    pub role: Role,
    pub name: String,
    pub email: Option<String>,
}

impl Identity {
    pub fn is_hr(&self) -> bool {
        self.role == Role::Hr
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Denied {
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    ExpiredToken,
    #[error("forbidden")]
    Forbidden,
}

impl From<Denied> for AppError {
    fn from(denied: Denied) -> Self {
        match denied {
            Denied::InvalidToken => AppError::InvalidToken,
            Denied::ExpiredToken => AppError::ExpiredToken,
            Denied::Forbidden => AppError::Forbidden,
        }
    }
}

/// Resolves a raw token string against the token table.
///
/// A token is expired once `now` is strictly past its `valid_until`.
pub fn resolve_token(
    tokens: &[AccessToken],
    token: &str,
    now: NaiveDateTime,
) -> Result<Identity, Denied> {
    if token.is_empty() {
        return Err(Denied::InvalidToken);
    }
    let entry = tokens
        .iter()
        .find(|t| t.token == token)
        .ok_or(Denied::InvalidToken)?;

    if now > entry.valid_until {
        return Err(Denied::ExpiredToken);
    }

    Ok(Identity {
        personnel_nr: entry.personnel_nr,
        role: entry.role,
        name: entry.name.clone(),
        email: entry.email.clone(),
    })
}

/// HR may touch every record; a manager only the ones they review.
pub fn can_access(identity: &Identity, record: &ReviewRecord) -> bool {
    match identity.role {
        Role::Hr => true,
        Role::Manager => record.manager_id == identity.personnel_nr,
        Role::Unknown => false,
    }
}

/// Full decision: token first, then either the given record or listing scope.
///
/// Without a record only HR and managers pass; the listing itself is narrowed
/// by the record service.
pub fn authorize(
    tokens: &[AccessToken],
    token: &str,
    record: Option<&ReviewRecord>,
    now: NaiveDateTime,
) -> Result<Identity, Denied> {
    let identity = resolve_token(tokens, token, now)?;
    let allowed = match record {
        Some(record) => can_access(&identity, record),
        None => matches!(identity.role, Role::Hr | Role::Manager),
    };
    if allowed {
        Ok(identity)
    } else {
        Err(Denied::Forbidden)
    }
}
