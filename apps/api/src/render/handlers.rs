//! Axum route handlers for PDF generation and download.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::errors::{run_blocking, AppError};
use crate::extract::ApiPath;
use crate::models::local_now;
use crate::render::service::{generate_record_pdf, safe_pdf_name};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GeneratePdfResponse {
    pub success: bool,
    pub filename: String,
    pub download_url: String,
}

/// POST /api/records/:id/pdf
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<u32>,
) -> Result<Json<GeneratePdfResponse>, AppError> {
    let store = state.store.clone();
    let pdf_dir = state.config.pdf_dir.clone();
    let page_config = state.page_config.clone();

    let filename = run_blocking(move || {
        generate_record_pdf(&store, &pdf_dir, &page_config, &identity, id, local_now())
    })
    .await?;

    Ok(Json(GeneratePdfResponse {
        success: true,
        download_url: format!("/api/pdf/{filename}"),
        filename,
    }))
}

/// GET /api/pdf/:filename
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    ApiPath(filename): ApiPath<String>,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound("PDF not found".to_string());
    let name = safe_pdf_name(&filename).ok_or_else(not_found)?;
    let path = state.config.pdf_dir.join(name);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(crate::storage::StorageError::io(&path, e).into()),
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
