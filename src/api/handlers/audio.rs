use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::{read_upload_form, upload_error, ListParams};
use crate::api::response::{ApiError, AppQuery, JSend, JSendPaginated, Pagination};
use crate::catalog::models::AudioRecord;
use crate::upload::AudioUpload;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct AudioResponse {
    pub id: String,
    pub title: String,
    pub narrator: String,
    pub original_filename: String,
    pub file_size: u64,
    pub file_type: String,
    pub duration_secs: Option<f64>,
    pub upload_date: String,
    pub description: Option<String>,
}

pub async fn create_audio(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<JSend<AudioResponse>>, ApiError> {
    let form = read_upload_form(multipart, state.config.max_upload_size).await?;

    let (data, filename) = match (form.file_data.clone(), form.filename.clone()) {
        (Some(data), Some(filename)) => (data, filename),
        _ => return Err(ApiError::bad_request("No file selected.")),
    };

    let record = state
        .uploader
        .upload_audio(AudioUpload {
            title: form.text("title"),
            narrator: form.text("narrator"),
            description: form.optional_text("description"),
            filename,
            data,
        })
        .await
        .map_err(upload_error)?;

    Ok(JSend::success(audio_to_response(&record)))
}

pub async fn get_audio(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JSend<AudioResponse>>, ApiError> {
    let record = state
        .catalog
        .get_audio(&id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Audio file not found"))?;

    Ok(JSend::success(audio_to_response(&record)))
}

pub async fn list_audio(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<JSendPaginated<AudioResponse>>, ApiError> {
    params.validate()?;

    let records = state
        .catalog
        .list_audio()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let total = records.len() as u64;
    let items: Vec<AudioResponse> = records
        .iter()
        .skip(params.offset())
        .take(params.page_size as usize)
        .map(audio_to_response)
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

pub(super) fn audio_to_response(record: &AudioRecord) -> AudioResponse {
    AudioResponse {
        id: record.id.clone(),
        title: record.title.clone(),
        narrator: record.narrator.clone(),
        original_filename: record.original_filename.clone(),
        file_size: record.file_size,
        file_type: record.file_type.clone(),
        duration_secs: record.duration_secs,
        upload_date: record.upload_date.to_rfc3339(),
        description: record.description.clone(),
    }
}
