//! File names for uploaded photos and their thumbnails.

use std::path::Path;

use crate::error::CoreError;

/// Prefix of every thumbnail file name.
pub const THUMB_PREFIX: &str = "thumb_";

/// Thumbnails are always JPEG regardless of the upload's format.
pub const THUMB_EXTENSION: &str = "jpg";

/// Name under which an upload is stored: `{millis}-{nonce}{ext}`.
///
/// The extension is taken from the client's file name and lower-cased; the
/// rest of the client's name is discarded.
pub fn upload_file_name(original_name: &str, millis: i64, nonce: u64) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();
    format!("{millis}-{nonce}{ext}")
}

/// Thumbnail name for a stored upload: `thumb_{stem}.jpg`.
pub fn thumb_file_name(full: &str) -> String {
    let stem = Path::new(full)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(full);
    format!("{THUMB_PREFIX}{stem}.{THUMB_EXTENSION}")
}

/// Reject names that could escape the uploads directory.
///
/// Clients echo stored names back when removing photos, so every such name
/// must be a single plain path component.
pub fn validate_stored_name(name: &str) -> Result<(), CoreError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(CoreError::Validation(format!(
            "Invalid stored file name '{name}'"
        )));
    }
    Ok(())
}
