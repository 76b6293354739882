//! Admin accounts and bearer-token sessions gating every archive route.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;

use crate::api::response::ApiError;
use crate::catalog::models::{AdminUser, Session};
use crate::catalog::{Catalog, CatalogError};
use crate::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    format!("{digest:x}")
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    hash_password(password) == password_hash
}

/// Authenticate an active admin and open a session.
pub fn login(
    catalog: &Catalog,
    username: &str,
    password: &str,
    ttl_hours: i64,
) -> Result<Session, AuthError> {
    let admin = catalog
        .get_admin(username)?
        .filter(|a| a.is_active)
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password, &admin.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    let now = Utc::now();
    let session = Session {
        token: format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        ),
        username: admin.username,
        created_at: now,
        expires_at: now + Duration::hours(ttl_hours),
    };
    catalog.put_session(&session)?;

    tracing::info!(username = %session.username, "Admin logged in");
    Ok(session)
}

pub fn logout(catalog: &Catalog, token: &str) -> Result<bool, CatalogError> {
    catalog.delete_session(token)
}

/// Idempotent startup step: when no admin accounts exist, create one with the
/// configured default credentials and warn loudly.
pub fn bootstrap_admin(
    catalog: &Catalog,
    username: &str,
    password: &str,
) -> Result<bool, CatalogError> {
    if catalog.count_admins()? > 0 {
        return Ok(false);
    }

    let admin = AdminUser {
        username: username.to_string(),
        password_hash: hash_password(password),
        email: format!("{username}@localhost"),
        created_at: Utc::now(),
        is_active: true,
    };
    catalog.put_admin(&admin)?;

    tracing::warn!(
        username = %admin.username,
        "no admin accounts found, created default admin with a well-known password; change it"
    );
    Ok(true)
}

/// Extension inserted by the middleware so handlers can see who is acting.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub username: String,
    pub token: String,
}

/// Middleware wrapping every admin route: resolves the bearer token to a live
/// session or short-circuits with 401 before any handler runs.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?
        .to_string();

    let session = state
        .catalog
        .get_session(&token)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::unauthorized("Session expired or invalid"))?;

    request.extensions_mut().insert(CurrentAdmin {
        username: session.username,
        token,
    });

    Ok(next.run(request).await)
}
