//! CLI argument parsing with clap.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::data_url::ImagePayload;
use crate::error::ImageError;
use crate::mime::image_mime_for;

/// Compose a product photo and a person photo into one lifestyle shot.
#[derive(Parser, Debug)]
#[command(name = "product-scene", version, about)]
pub struct Cli {
    /// Image of the product to feature.
    pub product: PathBuf,

    /// Image of the person who should use the product.
    pub person: PathBuf,

    /// Output file path (derived from the product name if not specified).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Model name or short alias [default: nano-banana].
    #[arg(short, long)]
    pub model: Option<String>,

    /// Convert the result to this format: jpeg, png, webp.
    #[arg(short, long)]
    pub format: Option<String>,

    /// Also print the result as a data URL on stdout.
    #[arg(long)]
    pub print_data_url: bool,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Read an image file and encode it as a data URL.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a recognizable image.
pub fn read_image_as_data_url(path: &Path) -> Result<String, ImageError> {
    let bytes = std::fs::read(path).map_err(|e| {
        ImageError::Io(std::io::Error::new(e.kind(), format!("{}: {e}", path.display())))
    })?;
    let mime = image_mime_for(path, &bytes).ok_or_else(|| {
        ImageError::InvalidArgument(format!("{} is not a recognized image", path.display()))
    })?;
    tracing::debug!(mime, bytes = bytes.len(), "Read {}", path.display());
    Ok(ImagePayload::new(mime, bytes).to_data_url())
}
