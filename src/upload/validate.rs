//! The two upload gates: extension allow-list, then magic-byte MIME sniffing
//! of the bytes already written to disk. The sniff is the authoritative check;
//! the extension gate just rejects obviously wrong uploads before any write.

use std::path::Path;

use tokio::io::AsyncReadExt;

use super::filename;
use crate::catalog::models::Category;

const MANUSCRIPT_EXTENSIONS: &[&str] = &["pdf", "docx", "doc"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "m4a"];

const MANUSCRIPT_MIMES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

// Covers the mime spellings infer emits for the four allowed containers.
const AUDIO_MIMES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/x-wav",
    "audio/flac",
    "audio/x-flac",
    "audio/mp4",
    "audio/m4a",
    "audio/x-m4a",
];

/// At most this many leading bytes are read for magic-byte detection.
const SNIFF_LEN: usize = 8192;

/// Extension gate: returns the lower-cased extension when the filename
/// carries one from the category's allow-set.
pub fn allowed_extension(category: Category, filename: &str) -> Option<String> {
    let ext = filename::extension(filename)?;
    let allowed = match category {
        Category::Manuscript => MANUSCRIPT_EXTENSIONS,
        Category::Audio => AUDIO_EXTENSIONS,
    };
    allowed.contains(&ext.as_str()).then_some(ext)
}

/// Content gate: sniff the written file's leading bytes and check the derived
/// MIME type against the category's allow-set. Returns the sniffed type on
/// success, or None for an unrecognized or disallowed type. The caller owns
/// cleanup of the rejected file.
pub async fn sniff_content(category: Category, path: &Path) -> std::io::Result<Option<String>> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut head = vec![0u8; SNIFF_LEN];
    let mut filled = 0;
    loop {
        let n = file.read(&mut head[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
        if filled == head.len() {
            break;
        }
    }
    head.truncate(filled);

    let Some(kind) = infer::get(&head) else {
        return Ok(None);
    };
    let mime = kind.mime_type();

    let allowed = match category {
        Category::Manuscript => MANUSCRIPT_MIMES,
        Category::Audio => AUDIO_MIMES,
    };
    Ok(allowed.contains(&mime).then(|| mime.to_string()))
}
