//! Defines routes for the per-user file gateway.
//!
//! ## Structure
//! - **File endpoints** (nested under `/api/s3`)
//!   - `POST /{username}/upload`: multipart upload, field `file`
//!   - `GET  /{username}/download/{filename}`: download as attachment
//!   - `GET  /{username}/search?searchKey=`: list/search the user's files
//!
//! - **Operational endpoints** (mounted at root)
//!   - `GET /healthz`, `GET /readyz`

use crate::{
    handlers::{
        file_handlers::{download_file, search_files, upload_file},
        health_handlers::{healthz, readyz},
    },
    services::storage_service::StorageService,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub const API_PREFIX: &str = "/api/s3";

/// Build the route table.
///
/// Uploads are capped at `max_upload_bytes`; a larger body is rejected as an
/// invalid upload.
pub fn routes(max_upload_bytes: usize) -> Router<StorageService> {
    let files = Router::new()
        .route(
            "/{username}/upload",
            post(upload_file).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/{username}/download/{filename}", get(download_file))
        .route("/{username}/search", get(search_files));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest(API_PREFIX, files)
}

/// The complete application: routes, request tracing, and shared state.
pub fn app(service: StorageService, max_upload_bytes: usize) -> Router {
    routes(max_upload_bytes)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
