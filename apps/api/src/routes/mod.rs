pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::auth::handlers::handle_login;
use crate::records::handlers::{
    handle_get_record, handle_list_records, handle_stats, handle_update_record,
};
use crate::render::handlers::{handle_download_pdf, handle_generate_pdf};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/login", post(handle_login))
        // Records
        .route("/api/records", get(handle_list_records))
        .route(
            "/api/records/:id",
            get(handle_get_record).put(handle_update_record),
        )
        .route("/api/records/:id/pdf", post(handle_generate_pdf))
        .route("/api/stats", get(handle_stats))
        // PDF export
        .route("/api/pdf/:filename", get(handle_download_pdf))
        .fallback_service(static_files)
        .with_state(state)
}
