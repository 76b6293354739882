//! The upload pipeline: stage -> sniff -> probe -> promote -> persist, with
//! cleanup on every failure edge so a rejected upload leaves neither a file
//! nor a record behind.

pub mod filename;
pub mod probe;
pub mod validate;

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use thiserror::Error;

use crate::catalog::models::{AudioRecord, Category, ManuscriptRecord};
use crate::catalog::{Catalog, CatalogError};
use crate::store::{MediaStore, StoreError};

#[derive(Debug, Error)]
pub enum UploadError {
    /// User-correctable rejection. No file or record remains.
    #[error("{0}")]
    Validation(String),
    /// Environment failure. Any partial write has been removed.
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl From<StoreError> for UploadError {
    fn from(e: StoreError) -> Self {
        UploadError::Storage(e.to_string())
    }
}

impl From<CatalogError> for UploadError {
    fn from(e: CatalogError) -> Self {
        UploadError::Storage(e.to_string())
    }
}

#[derive(Debug)]
pub struct ManuscriptUpload {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub filename: String,
    pub data: Bytes,
}

#[derive(Debug)]
pub struct AudioUpload {
    pub title: String,
    pub narrator: String,
    pub description: Option<String>,
    pub filename: String,
    pub data: Bytes,
}

/// Drives one upload end to end. Exactly one record is created per successful
/// upload; any failure removes whatever was written first.
#[derive(Clone)]
pub struct Uploader {
    catalog: Catalog,
    store: Arc<dyn MediaStore>,
}

impl Uploader {
    pub fn new(catalog: Catalog, store: Arc<dyn MediaStore>) -> Self {
        Self { catalog, store }
    }

    pub async fn upload_manuscript(
        &self,
        upload: ManuscriptUpload,
    ) -> Result<ManuscriptRecord, UploadError> {
        let title = required_field(&upload.title, "Title")?;
        let author = required_field(&upload.author, "Author")?;

        let prepared = self
            .prepare(
                Category::Manuscript,
                &upload.filename,
                upload.data,
                "Invalid file type. Only PDF, DOCX, and DOC files are allowed.",
            )
            .await?;

        if let Err(e) = self
            .store
            .promote(Category::Manuscript, &prepared.stored_filename)
            .await
        {
            self.cleanup_staged(Category::Manuscript, &prepared.stored_filename)
                .await;
            return Err(e.into());
        }

        let record = ManuscriptRecord {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            author,
            stored_filename: prepared.stored_filename.clone(),
            original_filename: prepared.original_filename,
            file_size: prepared.file_size,
            file_type: prepared.file_type,
            upload_date: Utc::now(),
            description: optional_field(upload.description),
        };

        if let Err(e) = self.catalog.insert_manuscript(&record) {
            self.cleanup_promoted(Category::Manuscript, &prepared.stored_filename)
                .await;
            return Err(e.into());
        }

        tracing::info!(
            record_id = %record.id,
            category = Category::Manuscript.label(),
            stored_filename = %record.stored_filename,
            file_size = record.file_size,
            "Upload complete"
        );
        Ok(record)
    }

    pub async fn upload_audio(&self, upload: AudioUpload) -> Result<AudioRecord, UploadError> {
        let title = required_field(&upload.title, "Title")?;
        let narrator = required_field(&upload.narrator, "Narrator")?;

        let prepared = self
            .prepare(
                Category::Audio,
                &upload.filename,
                upload.data,
                "Invalid file type. Only MP3, WAV, FLAC, and M4A files are allowed.",
            )
            .await?;

        // Duration comes from the staged file, before it moves. Non-fatal.
        let duration_secs = probe::audio_duration_secs(&prepared.staged_path).await;

        if let Err(e) = self
            .store
            .promote(Category::Audio, &prepared.stored_filename)
            .await
        {
            self.cleanup_staged(Category::Audio, &prepared.stored_filename)
                .await;
            return Err(e.into());
        }

        let record = AudioRecord {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            narrator,
            stored_filename: prepared.stored_filename.clone(),
            original_filename: prepared.original_filename,
            file_size: prepared.file_size,
            file_type: prepared.file_type,
            duration_secs,
            upload_date: Utc::now(),
            description: optional_field(upload.description),
        };

        if let Err(e) = self.catalog.insert_audio(&record) {
            self.cleanup_promoted(Category::Audio, &prepared.stored_filename)
                .await;
            return Err(e.into());
        }

        tracing::info!(
            record_id = %record.id,
            category = Category::Audio.label(),
            stored_filename = %record.stored_filename,
            file_size = record.file_size,
            duration_secs = ?record.duration_secs,
            "Upload complete"
        );
        Ok(record)
    }

    /// Shared front half of the pipeline: field and extension gates (no I/O),
    /// then stage, content sniff, and size probe. On any failure after the
    /// write, the staged file is removed before returning.
    async fn prepare(
        &self,
        category: Category,
        filename: &str,
        data: Bytes,
        extension_message: &str,
    ) -> Result<PreparedFile, UploadError> {
        if filename.trim().is_empty() {
            return Err(UploadError::Validation("No file selected.".to_string()));
        }
        if data.is_empty() {
            return Err(UploadError::Validation("No file selected.".to_string()));
        }

        let file_type = validate::allowed_extension(category, filename)
            .ok_or_else(|| UploadError::Validation(extension_message.to_string()))?;

        let original_filename = filename::sanitize(filename);
        let stored_filename = filename::allocate_stored_name(&original_filename);

        let staged_path = self.store.stage(category, &stored_filename, data).await?;

        let sniffed = match validate::sniff_content(category, &staged_path).await {
            Ok(result) => result,
            Err(e) => {
                self.cleanup_staged(category, &stored_filename).await;
                return Err(UploadError::Storage(e.to_string()));
            }
        };
        let Some(mime) = sniffed else {
            self.cleanup_staged(category, &stored_filename).await;
            tracing::warn!(
                category = category.label(),
                original_filename = %original_filename,
                "Content sniff rejected upload with allowed extension"
            );
            return Err(UploadError::Validation(
                "Invalid file type detected.".to_string(),
            ));
        };

        let file_size = match probe::file_size(&staged_path).await {
            Ok(size) => size,
            Err(e) => {
                self.cleanup_staged(category, &stored_filename).await;
                return Err(UploadError::Storage(e.to_string()));
            }
        };

        tracing::debug!(
            category = category.label(),
            stored_filename = %stored_filename,
            mime = %mime,
            "Content validated"
        );

        Ok(PreparedFile {
            original_filename,
            stored_filename,
            file_type,
            file_size,
            staged_path,
        })
    }

    async fn cleanup_staged(&self, category: Category, name: &str) {
        if let Err(e) = self.store.discard(category, name).await {
            tracing::warn!(
                category = category.label(),
                stored_filename = %name,
                error = %e,
                "Failed to discard staged file"
            );
        }
    }

    async fn cleanup_promoted(&self, category: Category, name: &str) {
        if let Err(e) = self.store.remove(category, name).await {
            tracing::warn!(
                category = category.label(),
                stored_filename = %name,
                error = %e,
                "Failed to remove file after catalog failure"
            );
        }
    }
}

struct PreparedFile {
    original_filename: String,
    stored_filename: String,
    file_type: String,
    file_size: u64,
    staged_path: std::path::PathBuf,
}

fn required_field(value: &str, label: &str) -> Result<String, UploadError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UploadError::Validation(format!("{label} is required.")));
    }
    Ok(trimmed.to_string())
}

fn optional_field(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
