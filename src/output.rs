//! File naming, image saving, and format conversion.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ImageError;
use crate::mime::extension_for_mime;

/// Validate the output format parameter.
///
/// # Errors
///
/// Returns an error if the format is not recognized.
pub fn validate_format(format: &str) -> Result<(), String> {
    match format {
        "jpeg" | "png" | "webp" => Ok(()),
        _ => Err(format!("Unsupported format '{format}'. Valid: jpeg, png, webp")),
    }
}

/// Get the file extension for an output format.
#[must_use]
pub fn format_extension(format: &str) -> &'static str {
    match format {
        "png" => "png",
        "webp" => "webp",
        _ => "jpg",
    }
}

/// Generate an output filename from the product file name.
///
/// Uses up to 40 sanitized characters of the product file stem, then
/// `-scene-` and a unix timestamp.
#[must_use]
pub fn auto_filename(product_path: &Path, extension: &str) -> String {
    let stem = product_path.file_stem().unwrap_or_default().to_string_lossy();
    let sanitized = sanitize_for_filename(&stem, 40);
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    format!("{sanitized}-scene-{timestamp}.{extension}")
}

/// Sanitize a string for use in a filename.
///
/// Converts to lowercase, replaces non-alphanumeric chars with hyphens,
/// collapses consecutive hyphens, and trims to max length.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut last_was_hyphen = true; // no leading hyphen

    for ch in input.chars() {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        "product".to_string()
    } else {
        result
    }
}

/// Resolve the output path: use the explicit path or derive one.
///
/// The derived extension follows `format` when given, else the MIME type
/// the model returned.
#[must_use]
pub fn resolve_output_path(
    explicit: Option<&str>,
    product_path: &Path,
    source_mime: &str,
    format: Option<&str>,
) -> PathBuf {
    match explicit {
        Some(p) => PathBuf::from(p),
        None => {
            let extension = format.map_or_else(|| extension_for_mime(source_mime), format_extension);
            PathBuf::from(auto_filename(product_path, extension))
        }
    }
}

/// Save raw image bytes to a file, converting format if one is requested
/// and it differs from the source.
///
/// # Errors
///
/// Returns an error if the file cannot be written or format conversion fails.
pub fn save_image(
    data: &[u8],
    source_mime: &str,
    target_format: Option<&str>,
    output_path: &Path,
) -> Result<(), ImageError> {
    match target_format {
        Some(format) if !mime_matches_format(source_mime, format) => {
            tracing::debug!("Converting {source_mime} to {format}");
            convert_and_save(data, format, output_path)
        }
        _ => std::fs::write(output_path, data).map_err(ImageError::Io),
    }
}

/// Check if a MIME type matches the requested output format.
fn mime_matches_format(mime: &str, format: &str) -> bool {
    matches!((mime, format), ("image/jpeg", "jpeg") | ("image/png", "png") | ("image/webp", "webp"))
}

fn convert_and_save(
    data: &[u8],
    target_format: &str,
    output_path: &Path,
) -> Result<(), ImageError> {
    let img = image::load_from_memory(data)
        .map_err(|e| ImageError::ImageConversion(format!("Failed to decode image: {e}")))?;

    let image_format = match target_format {
        "jpeg" => image::ImageFormat::Jpeg,
        "png" => image::ImageFormat::Png,
        "webp" => image::ImageFormat::WebP,
        other => {
            return Err(ImageError::ImageConversion(format!("Unsupported format: {other}")));
        }
    };

    // JPEG has no alpha channel.
    let img = if image_format == image::ImageFormat::Jpeg {
        image::DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };

    img.save_with_format(output_path, image_format)
        .map_err(|e| ImageError::ImageConversion(format!("Failed to save as {target_format}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_format_values() {
        assert!(validate_format("jpeg").is_ok());
        assert!(validate_format("png").is_ok());
        assert!(validate_format("webp").is_ok());
        assert!(validate_format("gif").is_err());
    }

    #[test]
    fn format_extension_mapping() {
        assert_eq!(format_extension("jpeg"), "jpg");
        assert_eq!(format_extension("png"), "png");
        assert_eq!(format_extension("webp"), "webp");
    }

    #[test]
    fn sanitize_basic() {
        assert_eq!(sanitize_for_filename("Blue Sneaker (v2)", 40), "blue-sneaker-v2");
    }

    #[test]
    fn sanitize_truncates() {
        let long = "a".repeat(100);
        assert_eq!(sanitize_for_filename(&long, 10).len(), 10);
    }

    #[test]
    fn sanitize_empty() {
        assert_eq!(sanitize_for_filename("", 40), "product");
        assert_eq!(sanitize_for_filename("___", 40), "product");
    }

    #[test]
    fn auto_filename_uses_product_stem() {
        let name = auto_filename(Path::new("/photos/Red Mug.png"), "jpg");
        assert!(name.starts_with("red-mug-scene-"), "got {name}");
        assert_eq!(Path::new(&name).extension().unwrap(), "jpg");
    }

    #[test]
    fn resolve_explicit() {
        let path = resolve_output_path(Some("out.png"), Path::new("mug.jpg"), "image/jpeg", None);
        assert_eq!(path, PathBuf::from("out.png"));
    }

    #[test]
    fn resolve_auto_follows_source_mime() {
        let path = resolve_output_path(None, Path::new("mug.jpg"), "image/png", None);
        assert_eq!(path.extension().unwrap(), "png");
    }

    #[test]
    fn resolve_auto_keeps_heic_source() {
        let path = resolve_output_path(None, Path::new("mug.jpg"), "image/heic", None);
        assert_eq!(path.extension().unwrap(), "heic");
    }

    #[test]
    fn resolve_auto_follows_format() {
        let path = resolve_output_path(None, Path::new("mug.jpg"), "image/png", Some("webp"));
        assert_eq!(path.extension().unwrap(), "webp");
    }

    #[test]
    fn save_without_format_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.bin");
        save_image(&[1, 2, 3], "image/png", None, &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn save_converts_png_to_jpeg() {
        let png = {
            let img = image::DynamicImage::new_rgba8(2, 2);
            let mut buf = std::io::Cursor::new(Vec::new());
            img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
            buf.into_inner()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.jpg");

        save_image(&png, "image/png", Some("jpeg"), &path).unwrap();
        let data = std::fs::read(&path).unwrap();
        assert_eq!(&data[..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn conversion_of_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_image(b"nope", "image/png", Some("jpeg"), &dir.path().join("x.jpg"))
            .unwrap_err();
        assert!(matches!(err, ImageError::ImageConversion(_)));
    }

    #[test]
    fn mime_matches() {
        assert!(mime_matches_format("image/jpeg", "jpeg"));
        assert!(mime_matches_format("image/png", "png"));
        assert!(!mime_matches_format("image/png", "jpeg"));
    }
}
