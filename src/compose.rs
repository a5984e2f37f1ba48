//! Composes a product image and a person image into one lifestyle shot.
//!
//! The composer turns two data URLs into a single generation request
//! (product, person, then the fixed creative brief), sends it through an
//! [`ImageGenerator`], and returns the first image in the reply as a data URL.

use crate::data_url::ImagePayload;
use crate::error::ImageError;
use crate::ports::image_generator::{
    GenerationRequest, GenerationResponse, ImageGenerator, Modality, Part,
};

/// Creative brief sent after the two images.
pub const PROMPT: &str = "
You are an expert creative director specializing in product photography. Your task is to combine two images into a single, photorealistic, and aesthetically pleasing lifestyle shot.

**Inputs:**
1.  **Product Image:** An image of a specific product.
2.  **Person/Influencer Image:** An image of a person.

**Goal:**
Create a new, high-quality, photorealistic image where the person from the second image is naturally and believably interacting with or using the product from the first image.

**Instructions:**
-   **Seamless Integration:** The product and person must look like they belong in the same scene. Pay close attention to lighting, shadows, reflections, and perspective to ensure a cohesive final image.
-   **Natural Interaction:** The person's pose, expression, and action should be natural and relevant to the product. It should look like a genuine moment, not a stiff or awkward pose.
-   **Aesthetic Scene:** Generate an appealing background/environment that complements the product and the person's style. The overall mood should be professional and suitable for marketing (e.g., bright and airy, cozy and warm, sleek and modern, depending on the product).
-   **Photorealism is Key:** The final output must look like a real photograph, not a digital composition or illustration. Avoid any uncanny or artificial-looking elements.
-   **Focus:** The product should be a clear focal point, but the overall image should tell a story about its use.
";

/// Sends product/person pairs to an image model and extracts the composite.
pub struct Composer {
    generator: Box<dyn ImageGenerator>,
    model: String,
}

impl Composer {
    /// Create a composer that issues requests for `model` through `generator`.
    pub fn new(generator: Box<dyn ImageGenerator>, model: impl Into<String>) -> Self {
        Self { generator, model: model.into() }
    }

    /// Compose the two images and return the generated scene as a data URL.
    ///
    /// Makes at most one call to the generator.
    ///
    /// # Errors
    ///
    /// - [`ImageError::InvalidDataUrl`] if either input is malformed; no call is made.
    /// - [`ImageError::NoImageInResponse`] if the reply carries no image part.
    /// - [`ImageError::GenerationFailed`] if the call itself fails. The cause
    ///   is logged and not returned.
    pub async fn generate(&self, product_image: &str, person_image: &str) -> Result<String, ImageError> {
        let product = parse_input("product", product_image)?;
        let person = parse_input("person", person_image)?;
        let request = build_request(&self.model, product, person);

        tracing::info!(model = %self.model, "Requesting product scene");
        let response = self.generator.generate(&request).await.map_err(|e| {
            tracing::error!("Error calling Gemini API: {e}");
            ImageError::GenerationFailed
        })?;

        let image = first_image(&response).ok_or_else(|| {
            tracing::warn!(parts = response.parts.len(), "Response contained no image part");
            ImageError::NoImageInResponse
        })?;
        tracing::debug!(mime_type = image.mime_type(), bytes = image.data().len(), "Scene generated");
        Ok(image.to_data_url())
    }
}

fn parse_input(which: &str, data_url: &str) -> Result<ImagePayload, ImageError> {
    ImagePayload::from_data_url(data_url)
        .map_err(|reason| ImageError::InvalidDataUrl { which: which.to_string(), reason })
}

/// Build the request: product image, person image, then [`PROMPT`], image output only.
#[must_use]
pub fn build_request(model: &str, product: ImagePayload, person: ImagePayload) -> GenerationRequest {
    GenerationRequest {
        model: model.to_string(),
        parts: vec![Part::Image(product), Part::Image(person), Part::Text { text: PROMPT.to_string() }],
        response_modalities: vec![Modality::Image],
    }
}

/// The first part whose payload is an `image/*` type, in declared order.
#[must_use]
pub fn first_image(response: &GenerationResponse) -> Option<&ImagePayload> {
    response.parts.iter().find_map(|part| match part {
        Part::Image(payload) if payload.is_image() => Some(payload),
        _ => None,
    })
}
