use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::access::resolve_token;
use crate::errors::{run_blocking, AppError};
use crate::extract::ApiJson;
use crate::models::{local_now, Role};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub token: String,
}

/// Identity as the front-end stores it after login.
#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub personnel_nr: u32,
    pub role: Role,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: LoginUser,
}

/// POST /api/login
pub async fn handle_login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let store = state.store.clone();
    let token = req.token.trim().to_string();
    let identity = run_blocking(move || {
        let tokens = store.load_tokens()?;
        Ok(resolve_token(&tokens, &token, local_now())?)
    })
    .await?;

    info!("Login: {} ({:?})", identity.name, identity.role);
    Ok(Json(LoginResponse {
        success: true,
        user: LoginUser {
            personnel_nr: identity.personnel_nr,
            role: identity.role,
            name: identity.name,
            email: identity.email.unwrap_or_default(),
        },
    }))
}
