use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::{read_upload_form, upload_error, ListParams};
use crate::api::response::{ApiError, AppQuery, JSend, JSendPaginated, Pagination};
use crate::catalog::models::ManuscriptRecord;
use crate::upload::ManuscriptUpload;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ManuscriptResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub original_filename: String,
    pub file_size: u64,
    pub file_type: String,
    pub upload_date: String,
    pub description: Option<String>,
}

pub async fn create_manuscript(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<JSend<ManuscriptResponse>>, ApiError> {
    let form = read_upload_form(multipart, state.config.max_upload_size).await?;

    let (data, filename) = match (form.file_data.clone(), form.filename.clone()) {
        (Some(data), Some(filename)) => (data, filename),
        _ => return Err(ApiError::bad_request("No file selected.")),
    };

    let record = state
        .uploader
        .upload_manuscript(ManuscriptUpload {
            title: form.text("title"),
            author: form.text("author"),
            description: form.optional_text("description"),
            filename,
            data,
        })
        .await
        .map_err(upload_error)?;

    Ok(JSend::success(manuscript_to_response(&record)))
}

pub async fn get_manuscript(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JSend<ManuscriptResponse>>, ApiError> {
    let record = state
        .catalog
        .get_manuscript(&id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Manuscript not found"))?;

    Ok(JSend::success(manuscript_to_response(&record)))
}

pub async fn list_manuscripts(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<JSendPaginated<ManuscriptResponse>>, ApiError> {
    params.validate()?;

    let records = state
        .catalog
        .list_manuscripts()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let total = records.len() as u64;
    let items: Vec<ManuscriptResponse> = records
        .iter()
        .skip(params.offset())
        .take(params.page_size as usize)
        .map(manuscript_to_response)
        .collect();

    Ok(JSendPaginated::success(
        items,
        Pagination {
            page: params.page,
            page_size: params.page_size,
            total,
        },
    ))
}

pub(super) fn manuscript_to_response(record: &ManuscriptRecord) -> ManuscriptResponse {
    ManuscriptResponse {
        id: record.id.clone(),
        title: record.title.clone(),
        author: record.author.clone(),
        original_filename: record.original_filename.clone(),
        file_size: record.file_size,
        file_type: record.file_type.clone(),
        upload_date: record.upload_date.to_rfc3339(),
        description: record.description.clone(),
    }
}
