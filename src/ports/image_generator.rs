//! Image generator port for the external generation API.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::data_url::ImagePayload;
use crate::error::ImageError;

/// Output modality requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    /// Image output.
    Image,
    /// Text output.
    Text,
}

/// One unit of content in a request or response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Part {
    /// Plain text.
    Text {
        /// The text content.
        text: String,
    },
    /// Inline binary data, normally an image.
    Image(ImagePayload),
}

/// A request to generate content from an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The resolved model identifier (e.g., `"gemini-2.5-flash-image"`).
    pub model: String,
    /// Input parts, in the order the model sees them.
    pub parts: Vec<Part>,
    /// Modalities the response may contain.
    pub response_modalities: Vec<Modality>,
}

/// Ordered parts returned by the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// The returned parts, in declared order.
    pub parts: Vec<Part>,
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<GenerationResponse, ImageError>> + Send + 'a>>;

/// Sends generation requests to an external API.
pub trait ImageGenerator: Send + Sync {
    /// Issue one generation call.
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_>;
}
