use crate::domain::model::{EncodedImage, SourceFile};
use crate::domain::ports::ImageEncoder;
use crate::utils::error::{ExtractError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// File extensions accepted as recognition input.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];

/// Reads an image from disk and prepares the base64 payload for the
/// recognition request.
pub struct FileSystemEncoder;

#[async_trait]
impl ImageEncoder for FileSystemEncoder {
    async fn encode(&self, file: &SourceFile) -> Result<EncodedImage> {
        let bytes = tokio::fs::read(&file.path).await?;
        let media_type = detect_media_type(&bytes, &file.name)?;
        tracing::debug!(
            "Encoded \"{}\" as {} ({} byte(s))",
            file.name,
            media_type,
            bytes.len()
        );
        Ok(EncodedImage {
            media_type,
            payload: STANDARD.encode(&bytes),
        })
    }
}

// Magic bytes first, extension as a fallback for formats without a sniffable
// header in the bytes we got.
fn detect_media_type(bytes: &[u8], name: &str) -> Result<String> {
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Ok("image/png".to_string());
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Ok("image/jpeg".to_string());
    }
    if bytes.starts_with(b"GIF8") {
        return Ok("image/gif".to_string());
    }
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Ok("image/webp".to_string());
    }
    if bytes.starts_with(b"BM") {
        return Ok("image/bmp".to_string());
    }

    let extension = std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => Ok("image/png".to_string()),
        Some("jpg") | Some("jpeg") => Ok("image/jpeg".to_string()),
        Some("gif") => Ok("image/gif".to_string()),
        Some("webp") => Ok("image/webp".to_string()),
        Some("bmp") => Ok("image/bmp".to_string()),
        Some("heic") | Some("heif") => Err(ExtractError::EncodeError {
            message: format!(
                "{}: HEIC/HEIF input is not supported, convert to JPEG first",
                name
            ),
        }),
        _ => Err(ExtractError::EncodeError {
            message: format!("unsupported image format: {}", name),
        }),
    }
}
