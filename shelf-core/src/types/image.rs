//! Embedded images as data URIs

use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::Path;

/// Fallback MIME type for unrecognized extensions
const DEFAULT_MIME: &str = "application/octet-stream";

/// Guess an image MIME type from a file extension
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => DEFAULT_MIME,
    }
}

/// Encode bytes as a `data:` URI
pub fn to_data_uri(mime_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(data))
}

/// Read an image file and embed it as a data URI
pub async fn load_data_uri(path: impl AsRef<Path>) -> std::io::Result<String> {
    let path = path.as_ref();
    let data = tokio::fs::read(path).await?;
    let mime = path
        .extension()
        .and_then(|e| e.to_str())
        .map(mime_for_extension)
        .unwrap_or(DEFAULT_MIME);
    tracing::debug!("Embedding {:?} as {} ({} bytes)", path, mime, data.len());
    Ok(to_data_uri(mime, &data))
}
