//! Unified error type for product-scene.

use thiserror::Error;

/// Errors that can occur while composing a product scene.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The Gemini API returned an error response or an unusable body.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// No API key configured; nothing can be generated without one.
    #[error("No API key for Gemini. Set {env_var} or add it to the config file.")]
    MissingApiKey {
        /// The environment variable name.
        env_var: String,
    },

    /// An input was not a `data:<mime>;base64,<payload>` string.
    #[error("Invalid {which} data URL: {reason}")]
    InvalidDataUrl {
        /// Which input was malformed (e.g. `"product"`).
        which: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The call succeeded but returned no image part.
    #[error("No image was generated in the response.")]
    NoImageInResponse,

    /// The generation call failed. The cause is logged, not carried.
    #[error(
        "Failed to generate image. The model may have refused the request due to safety \
         policies or an internal error."
    )]
    GenerationFailed,
}
