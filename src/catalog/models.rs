use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two kinds of artifacts the archive accepts. Determines the
/// extension/MIME allow-lists and the on-disk storage root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Manuscript,
    Audio,
}

impl Category {
    /// Directory name under the upload root where committed files live.
    pub fn storage_dir(self) -> &'static str {
        match self {
            Category::Manuscript => "manuscripts",
            Category::Audio => "audio",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Manuscript => "manuscript",
            Category::Audio => "audio",
        }
    }
}

/// A manuscript upload stored in redb. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManuscriptRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    /// Unique generated name the file is persisted under.
    pub stored_filename: String,
    /// Sanitized client-supplied name, kept for display and download naming.
    pub original_filename: String,
    pub file_size: u64,
    /// Lower-cased extension: pdf, docx, or doc.
    pub file_type: String,
    pub upload_date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
}

/// An audio recording stored in redb. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioRecord {
    pub id: String,
    pub title: String,
    pub narrator: String,
    pub stored_filename: String,
    pub original_filename: String,
    pub file_size: u64,
    /// Lower-cased extension: mp3, wav, flac, or m4a.
    pub file_type: String,
    /// Best-effort duration in seconds; None when the container yields none.
    #[serde(default)]
    pub duration_secs: Option<f64>,
    pub upload_date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
}

/// An administrator account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub username: String,
    /// SHA-256 hex digest of the password.
    pub password_hash: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// A login session. Tokens are opaque 128-bit values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
