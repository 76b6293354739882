use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::{ApiError, AppJson, JSend};
use crate::auth::{self, AuthError, CurrentAdmin};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub expires_at: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<JSend<LoginResponse>>, ApiError> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request(
            "Please enter both username and password.",
        ));
    }

    let session = auth::login(
        &state.catalog,
        req.username.trim(),
        &req.password,
        state.config.session_ttl_hours,
    )
    .map_err(|e| match e {
        AuthError::InvalidCredentials => ApiError::unauthorized("Invalid username or password."),
        AuthError::Catalog(e) => ApiError::internal(e.to_string()),
    })?;

    Ok(JSend::success(LoginResponse {
        token: session.token,
        username: session.username,
        expires_at: session.expires_at.to_rfc3339(),
    }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<CurrentAdmin>,
) -> Result<Json<JSend<()>>, ApiError> {
    auth::logout(&state.catalog, &admin.token).map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::info!(username = %admin.username, "Admin logged out");
    Ok(JSend::success(()))
}
