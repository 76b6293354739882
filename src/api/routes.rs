use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::auth::require_session;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_size as usize;

    // Everything an administrator touches sits behind the session check.
    let mut admin_routes = Router::new()
        .route("/auth/logout", post(handlers::logout))
        .route("/dashboard", get(handlers::dashboard))
        // Manuscripts
        .route("/manuscripts", get(handlers::list_manuscripts))
        .route(
            "/manuscripts",
            post(handlers::create_manuscript).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/manuscripts/:id", get(handlers::get_manuscript))
        .route(
            "/manuscripts/:id/download",
            get(handlers::download_manuscript),
        )
        // Audio
        .route("/audio", get(handlers::list_audio))
        .route(
            "/audio",
            post(handlers::create_audio).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/audio/:id", get(handlers::get_audio))
        .route("/audio/:id/download", get(handlers::download_audio));

    // Test-only routes
    if state.config.test_mode {
        tracing::warn!("test mode enabled, purge route is available");
        admin_routes = admin_routes.route("/admin/purge", delete(handlers::admin_purge));
    }

    let admin_routes = admin_routes.route_layer(middleware::from_fn_with_state(
        Arc::clone(&state),
        require_session,
    ));

    Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/_internal/health", get(handlers::health))
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
