mod local;

pub use local::LocalStore;

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::models::Category;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("File not found: {0}")]
    NotFound(String),
}

/// Filesystem home of uploaded artifacts, keyed by category and stored
/// filename. Writes are two-phase: `stage` lands bytes in a staging area for
/// content inspection, `promote` moves them to the category root. An
/// unvalidated file is never visible at its final path.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Write bytes to the staging area and return the staged path so the
    /// caller can sniff and probe the artifact before committing to it.
    async fn stage(&self, category: Category, name: &str, data: Bytes)
        -> Result<PathBuf, StoreError>;

    /// Move a staged file into its category root.
    async fn promote(&self, category: Category, name: &str) -> Result<(), StoreError>;

    /// Remove a staged file. Missing files are not an error.
    async fn discard(&self, category: Category, name: &str) -> Result<(), StoreError>;

    /// Read a promoted file's bytes.
    async fn read(&self, category: Category, name: &str) -> Result<Bytes, StoreError>;

    /// Remove a promoted file. Missing files are not an error.
    async fn remove(&self, category: Category, name: &str) -> Result<(), StoreError>;

    async fn exists(&self, category: Category, name: &str) -> Result<bool, StoreError>;
}
