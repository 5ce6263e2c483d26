use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// False until `setup` has created the employee and record tables.
    pub tables_ready: bool,
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "review-api",
        version: env!("CARGO_PKG_VERSION"),
        tables_ready: state.store.employees_exist() && state.store.records_exist(),
    })
}
