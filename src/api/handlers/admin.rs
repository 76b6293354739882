use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::audio::AudioResponse;
use super::manuscripts::ManuscriptResponse;
use crate::api::response::{ApiError, JSend};
use crate::AppState;

const DASHBOARD_RECENT: usize = 5;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub manuscript_count: u64,
    pub audio_count: u64,
    pub recent_manuscripts: Vec<ManuscriptResponse>,
    pub recent_audio: Vec<AudioResponse>,
}

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub manuscripts_deleted: u64,
    pub audio_deleted: u64,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health() -> Json<JSend<HealthResponse>> {
    JSend::success(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<DashboardResponse>>, ApiError> {
    let manuscripts = state
        .catalog
        .list_manuscripts()
        .map_err(|e| ApiError::internal(e.to_string()))?;
    let audio = state
        .catalog
        .list_audio()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(JSend::success(DashboardResponse {
        manuscript_count: manuscripts.len() as u64,
        audio_count: audio.len() as u64,
        recent_manuscripts: manuscripts
            .iter()
            .take(DASHBOARD_RECENT)
            .map(super::manuscripts::manuscript_to_response)
            .collect(),
        recent_audio: audio
            .iter()
            .take(DASHBOARD_RECENT)
            .map(super::audio::audio_to_response)
            .collect(),
    }))
}

pub async fn admin_purge(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<PurgeResponse>>, ApiError> {
    let stats = state
        .catalog
        .purge_records()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::warn!(
        manuscripts = stats.manuscripts,
        audio = stats.audio,
        "Purged all records"
    );

    Ok(JSend::success(PurgeResponse {
        manuscripts_deleted: stats.manuscripts,
        audio_deleted: stats.audio,
    }))
}
