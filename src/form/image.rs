//! Turning an uploaded image into a displayable `data:` URI preview.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::errors::ImageDecodeError;
use crate::models::{ProfileImage, ProfilePicture};

/// Raw image as picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Decode a base64 payload. A leading `data:...;base64,` header is tolerated.
    pub fn from_base64(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: &str,
    ) -> Result<Self, ImageDecodeError> {
        let payload = match data.split_once(";base64,") {
            Some((header, rest)) if header.starts_with("data:") => rest,
            _ => data,
        };
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| ImageDecodeError::InvalidEncoding(e.to_string()))?;
        Ok(Self::new(file_name, content_type, bytes))
    }

    /// Read an image file from disk, guessing its type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self, ImageDecodeError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = guess_content_type(path).to_string();
        Ok(Self::new(file_name, content_type, bytes))
    }
}

/// Whether a MIME type passes the picker's `image/*` filter.
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}

fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Encode the upload into a picture with its preview.
///
/// Encoding runs on the blocking pool so large files do not stall the executor.
pub async fn decode_preview(
    upload: ImageUpload,
    max_bytes: usize,
) -> Result<ProfilePicture, ImageDecodeError> {
    if upload.bytes.is_empty() {
        return Err(ImageDecodeError::Empty);
    }
    if upload.bytes.len() > max_bytes {
        return Err(ImageDecodeError::TooLarge {
            size: upload.bytes.len(),
            max: max_bytes,
        });
    }

    tokio::task::spawn_blocking(move || {
        let preview = format!(
            "data:{};base64,{}",
            upload.content_type,
            STANDARD.encode(&upload.bytes)
        );
        ProfilePicture {
            profile_image: ProfileImage {
                file_name: upload.file_name,
                content_type: upload.content_type,
                size: upload.bytes.len(),
                bytes: upload.bytes,
            },
            profile_image_preview: preview,
        }
    })
    .await
    .map_err(|e| ImageDecodeError::Worker(e.to_string()))
}
