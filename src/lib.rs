//! media-archive - An admin-gated repository for manuscript and audio uploads
//!
//! This crate provides validated file upload, metadata records, and content
//! serving with:
//! - A two-gate validation pipeline (extension allow-list, then magic-byte
//!   MIME sniffing of the written bytes) with rollback of rejected files
//! - redb embedded database for catalog records (ACID, MVCC, crash-safe)
//! - Staged writes: a file reaches its category root only after validation
//! - Session-gated REST API with multipart upload support

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod store;
pub mod upload;

use std::sync::Arc;

use catalog::Catalog;
use config::Config;
use upload::Uploader;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
    pub store: Arc<dyn store::MediaStore>,
    pub uploader: Uploader,
}
