use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ALLOWED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Upload size limit (10 MiB).
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("Invalid file type. Only JPEG, PNG, GIF, and WebP are allowed.")]
    UnsupportedType(String),

    #[error("File size too large. Maximum 10MB allowed.")]
    TooLarge(u64),
}

/// An uploaded image record as returned by the image endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedImage {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "DeletedAt", default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub trip_id: Option<u64>,
    pub url: String,
    pub file_name: String,
    pub original_name: String,
    pub file_size: u64,
    pub mime_type: String,
    #[serde(default)]
    pub uploaded_by: Option<u64>,
}

/// Which public route an image is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Gallery,
    Cover,
}

/// Checks an image's MIME type and size before upload.
///
/// # Errors
///
/// Returns [`ImageError`] when the type is not accepted or the file exceeds
/// [`MAX_IMAGE_BYTES`].
pub fn validate_image(mime_type: &str, size: u64) -> Result<(), ImageError> {
    if !ALLOWED_IMAGE_TYPES.contains(&mime_type) {
        return Err(ImageError::UnsupportedType(mime_type.to_string()));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge(size));
    }
    Ok(())
}

/// Guesses an image MIME type from the file extension.
#[must_use]
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Resolves a stored image path into a URL the browser can load.
///
/// `asset_base` is the API host without the `/api/v1` suffix, for example
/// `http://localhost:8080`. Absolute URLs are returned unchanged.
#[must_use]
pub fn display_url(asset_base: &str, stored: &str, kind: ImageKind) -> String {
    let base = asset_base.trim_end_matches('/');
    if stored.starts_with("http") {
        return stored.to_string();
    }
    let file_name = || stored.rsplit('/').next().unwrap_or(stored);
    if stored.starts_with("/uploads/images/") {
        return format!("{base}/api/v1/images/{}", file_name());
    }
    if stored.starts_with("/uploads/covers/") {
        return format!("{base}/api/v1/covers/{}", file_name());
    }
    if stored.starts_with("/uploads") {
        return format!("{base}{stored}");
    }
    match kind {
        ImageKind::Gallery => format!("{base}/api/v1/images/{stored}"),
        ImageKind::Cover => format!("{base}/api/v1/covers/{stored}"),
    }
}
