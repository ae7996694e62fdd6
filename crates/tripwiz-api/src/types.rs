//! Wire envelopes used by the trip planner API.
//!
//! Resource payloads themselves (`Trip`, `User`, `Preference`,
//! `UploadedImage`) live in `tripwiz-core`; only the wrappers are here.

use serde::Deserialize;
use tripwiz_core::UploadedImage;

/// Standard `{ "data": ..., "message": ... }` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of the multi-image endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ImagesResponse {
    #[serde(default)]
    pub images: Vec<UploadedImage>,
}

/// Response of the cover upload endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ImageResponse {
    pub image: UploadedImage,
}

/// Error body shape; servers use either key.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Extracts the human-readable message from a raw error body.
    pub(crate) fn message_from(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed
            .message
            .or(parsed.error)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}
