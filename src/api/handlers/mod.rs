mod admin;
mod audio;
mod auth;
mod downloads;
mod manuscripts;

use std::collections::HashMap;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use serde::Deserialize;

use crate::api::response::ApiError;
use crate::upload::UploadError;

pub use admin::{admin_purge, dashboard, health};
pub use audio::{create_audio, get_audio, list_audio};
pub use auth::{login, logout};
pub use downloads::{download_audio, download_manuscript};
pub use manuscripts::{create_manuscript, get_manuscript, list_manuscripts};

/// Map a multipart read failure to an ApiError. A tripped body limit surfaces
/// from the multipart stream as 413, not as a generic parse failure.
fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("File exceeds the maximum upload size")
    } else {
        ApiError::bad_request(format!("Invalid multipart data: {}", e.body_text()))
    }
}

/// Map an orchestrator failure to an ApiError
fn upload_error(e: UploadError) -> ApiError {
    match e {
        UploadError::Validation(msg) => ApiError::bad_request(msg),
        UploadError::Storage(msg) => {
            tracing::error!(error = %msg, "Upload failed on storage path");
            ApiError::internal("Upload failed due to a storage error")
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListParams {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_page_size")]
    page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

impl ListParams {
    fn validate(&self) -> Result<(), ApiError> {
        if self.page == 0 {
            return Err(ApiError::bad_request("page starts at 1"));
        }
        if self.page_size == 0 || self.page_size > 100 {
            return Err(ApiError::bad_request("page_size must be between 1 and 100"));
        }
        Ok(())
    }

    fn offset(&self) -> usize {
        (self.page as usize - 1) * self.page_size as usize
    }
}

/// A parsed upload form: the file part plus whatever text fields came with it.
struct UploadForm {
    file_data: Option<Bytes>,
    filename: Option<String>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    fn optional_text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }
}

/// Read a multipart upload request, enforcing the configured size cap on the
/// file part. Unknown fields are ignored.
async fn read_upload_form(
    mut multipart: Multipart,
    max_upload_size: u64,
) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm {
        file_data: None,
        filename: None,
        fields: HashMap::new(),
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "file" {
            form.filename = field.file_name().map(|s| s.to_string());

            let data = field.bytes().await.map_err(multipart_error)?;

            if data.len() as u64 > max_upload_size {
                return Err(ApiError::payload_too_large(format!(
                    "File exceeds maximum upload size of {max_upload_size} bytes"
                )));
            }
            form.file_data = Some(data);
        } else if !field_name.is_empty() {
            let text = field.text().await.map_err(multipart_error)?;
            form.fields.insert(field_name, text);
        }
    }

    Ok(form)
}
