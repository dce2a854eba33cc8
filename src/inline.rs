// Inline mode: embed the image as a base64 `data:` URI instead of
// uploading it. No network access.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use tracing::debug;

use crate::markdown::{img_tag, ImageRef};

/// Media type for a data URI, from the file extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Replacement markup for `image`, whose file at `path` holds `bytes`.
pub fn inline(bytes: &[u8], path: &Path, image: &ImageRef) -> String {
    let data = STANDARD.encode(bytes);
    debug!(path = %path.display(), encoded = data.len(), "inlined image");
    img_tag(&image.alt, &format!("data:{};base64,{}", mime_for(path), data))
}
