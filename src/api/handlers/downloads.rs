use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::api::response::ApiError;
use crate::catalog::models::Category;
use crate::store::StoreError;
use crate::AppState;

/// Download a manuscript's bytes under its original filename.
/// Route: GET /manuscripts/:id/download
pub async fn download_manuscript(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let record = state
        .catalog
        .get_manuscript(&id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Manuscript not found"))?;

    serve_attachment(
        &state,
        Category::Manuscript,
        &record.id,
        &record.stored_filename,
        &record.original_filename,
        &record.file_type,
    )
    .await
}

/// Download an audio recording's bytes under its original filename.
/// Route: GET /audio/:id/download
pub async fn download_audio(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let record = state
        .catalog
        .get_audio(&id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Audio file not found"))?;

    serve_attachment(
        &state,
        Category::Audio,
        &record.id,
        &record.stored_filename,
        &record.original_filename,
        &record.file_type,
    )
    .await
}

async fn serve_attachment(
    state: &AppState,
    category: Category,
    record_id: &str,
    stored_filename: &str,
    original_filename: &str,
    file_type: &str,
) -> Result<Response, ApiError> {
    let data = state
        .store
        .read(category, stored_filename)
        .await
        .map_err(|e| match e {
            StoreError::NotFound(_) => {
                // A record without its file means the catalog and the
                // filesystem have drifted. Keep the caller-facing message
                // plain but make the drift visible to operators.
                tracing::warn!(
                    record_id = %record_id,
                    category = category.label(),
                    stored_filename = %stored_filename,
                    "Catalog record exists but backing file is missing"
                );
                ApiError::not_found("File not found")
            }
            _ => ApiError::internal(format!("Failed to retrieve file: {e}")),
        })?;

    let mut response = (StatusCode::OK, data).into_response();
    let headers = response.headers_mut();

    let mime = mime_guess::from_ext(file_type)
        .first_or_octet_stream()
        .to_string();
    headers.insert(
        header::CONTENT_TYPE,
        mime.parse()
            .unwrap_or(header::HeaderValue::from_static("application/octet-stream")),
    );

    if let Ok(value) = format!("attachment; filename=\"{original_filename}\"").parse() {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}
