//! HTTP handlers for per-user file operations.
//! Argument marshaling only; everything else is delegated to `StorageService`.

use crate::{errors::AppError, services::storage_service::StorageService};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State, multipart::MultipartRejection},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

pub const FILE_FIELD: &str = "file";
pub const UPLOAD_OK_MESSAGE: &str = "S3 File Uploaded successfully";

/// Query params accepted by the search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "searchKey", default)]
    pub search_key: String,
}

/// `POST /{username}/upload`: multipart form with a single `file` field.
pub async fn upload_file(
    State(service): State<StorageService>,
    Path(username): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<&'static str, AppError> {
    let mut multipart = multipart.map_err(AppError::invalid_upload)?;
    let (filename, content) = read_file_field(&mut multipart).await?;
    let size = content.len();

    service.upload(&username, &filename, content).await?;

    info!("stored {} ({} bytes) for {}", filename, size, username);
    Ok(UPLOAD_OK_MESSAGE)
}

/// `GET /{username}/download/{filename}`: raw bytes as an attachment.
pub async fn download_file(
    State(service): State<StorageService>,
    Path((username, filename)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let content = service.download(&username, &filename).await?;
    let disposition = attachment_disposition(&filename)?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    )
        .into_response())
}

/// `GET /{username}/search?searchKey=`: JSON array of matching filenames.
pub async fn search_files(
    State(service): State<StorageService>,
    Path(username): Path<String>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let filenames = service.list_files(&username, &q.search_key).await?;
    Ok(Json(filenames))
}

/// `attachment; filename={filename}`, or the percent-encoded
/// `filename*=UTF-8''` form when the name is not a valid header value.
fn attachment_disposition(filename: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(&format!("attachment; filename={}", filename))
        .or_else(|_| {
            HeaderValue::from_str(&format!(
                "attachment; filename*=UTF-8''{}",
                urlencoding::encode(filename)
            ))
        })
        .map_err(AppError::internal)
}

/// Pull the original filename and bytes out of the `file` field, skipping
/// any other fields.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(AppError::invalid_upload)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| AppError::invalid_upload("`file` field carries no filename"))?;
        let content = field.bytes().await.map_err(AppError::invalid_upload)?;
        return Ok((filename, content));
    }

    Err(AppError::invalid_upload("multipart body has no `file` field"))
}
