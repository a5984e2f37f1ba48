//! Image MIME detection for input files.

use std::path::Path;

/// Detect an image MIME type from the leading magic bytes.
#[must_use]
pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        _ => None,
    }
}

/// Guess an image MIME type from a file extension.
#[must_use]
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Resolve the MIME type of an image file, preferring its contents.
#[must_use]
pub fn image_mime_for(path: &Path, bytes: &[u8]) -> Option<&'static str> {
    detect_image_mime(bytes).or_else(|| {
        let guessed = mime_from_extension(path);
        if let Some(mime) = guessed {
            tracing::warn!(
                "Unrecognized image header in {} (first 4 bytes: {:02X?}), using {mime} from extension",
                path.display(),
                &bytes[..bytes.len().min(4)]
            );
        }
        guessed
    })
}

/// File extension for an image MIME type.
#[must_use]
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/heic" => "heic",
        "image/heif" => "heif",
        _ => "jpg",
    }
}
