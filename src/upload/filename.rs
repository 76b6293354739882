//! Filename sanitization and unique stored-name allocation.

/// Base name used when sanitization strips a client filename down to nothing.
const FALLBACK_STEM: &str = "upload";

/// Reduce a client-supplied filename to a safe display/storage form: the last
/// path segment only, whitespace collapsed to underscores, anything outside
/// ASCII alphanumerics and `.`, `_`, `-` dropped. Never returns an empty
/// string.
pub fn sanitize(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);

    let mut cleaned = String::with_capacity(base.len());
    for ch in base.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
            cleaned.push(ch);
        } else if ch.is_whitespace() {
            cleaned.push('_');
        }
    }

    // A leading dot would hide the file on unix-like systems.
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_' || c == '-') {
        return FALLBACK_STEM.to_string();
    }
    cleaned.to_string()
}

/// Allocate a collision-resistant on-disk name from a sanitized filename by
/// inserting a random 128-bit token between the stem and the extension.
pub fn allocate_stored_name(sanitized: &str) -> String {
    let token = uuid::Uuid::new_v4().simple().to_string();
    match sanitized.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!("{stem}_{token}.{ext}")
        }
        _ => format!("{sanitized}_{token}"),
    }
}

/// Lower-cased extension of a filename, if it has one.
pub fn extension(filename: &str) -> Option<String> {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_lowercase()),
        _ => None,
    }
}
