//! Axum route handlers for the record API.

use axum::{
    extract::State,
    Json,
};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::errors::{run_blocking, AppError};
use crate::extract::{ApiJson, ApiPath};
use crate::models::local_now;
use crate::records::service::{self, RecordPatch, RecordStats, RecordView};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecordListResponse {
    pub success: bool,
    pub records: Vec<RecordView>,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub success: bool,
    pub record: RecordView,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: RecordStats,
}

/// GET /api/records
pub async fn handle_list_records(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<RecordListResponse>, AppError> {
    let store = state.store.clone();
    let records = run_blocking(move || service::list_records(&store, &identity)).await?;
    Ok(Json(RecordListResponse {
        success: true,
        records,
    }))
}

/// GET /api/records/:id
pub async fn handle_get_record(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<u32>,
) -> Result<Json<RecordResponse>, AppError> {
    let store = state.store.clone();
    let record = run_blocking(move || service::get_record(&store, &identity, id)).await?;
    Ok(Json(RecordResponse {
        success: true,
        record,
    }))
}

/// PUT /api/records/:id
pub async fn handle_update_record(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<u32>,
    ApiJson(body): ApiJson<serde_json::Value>,
) -> Result<Json<UpdateResponse>, AppError> {
    let patch = RecordPatch::from_json(body)?;
    let store = state.store.clone();
    run_blocking(move || service::update_record(&store, &identity, id, &patch, local_now()))
        .await?;
    Ok(Json(UpdateResponse {
        success: true,
        message: "Saved".to_string(),
    }))
}

/// GET /api/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<StatsResponse>, AppError> {
    let store = state.store.clone();
    let stats = run_blocking(move || service::record_stats(&store, &identity)).await?;
    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}
