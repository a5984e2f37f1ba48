//! Live adapter for the Gemini `generateContent` API.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::data_url::ImagePayload;
use crate::error::ImageError;
use crate::ports::image_generator::{
    GenerateFuture, GenerationRequest, GenerationResponse, ImageGenerator, Modality, Part,
};

/// Inline image data from the API may arrive with or without `=` padding.
const RESPONSE_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Live Gemini generator that calls the Google AI API.
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiGenerator {
    /// Create a new Gemini generator with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { client: Client::new(), api_key, base_url: GEMINI_API_BASE.to_string() }
    }

    /// Point the generator at a different API host.
    #[cfg(test)]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl ImageGenerator for GeminiGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, request.model);
        let body = GeminiRequest::from(request);
        Box::pin(async move {
            tracing::debug!(%url, parts = body.contents[0].parts.len(), "Sending Gemini request");

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;

            if !status.is_success() {
                return Err(ImageError::Api { status: status.as_u16(), message: response_text });
            }

            let parsed: GeminiResponse = serde_json::from_str(&response_text).map_err(|e| {
                ImageError::Api { status: 200, message: format!("Failed to parse response: {e}") }
            })?;

            if parsed.candidates.is_empty() {
                if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
                    return Err(ImageError::Api {
                        status: 200,
                        message: format!("Prompt blocked: {reason}"),
                    });
                }
            }

            let raw_parts = parsed
                .candidates
                .into_iter()
                .next()
                .and_then(|c| c.content)
                .map(|c| c.parts)
                .unwrap_or_default();

            let mut parts = Vec::with_capacity(raw_parts.len());
            for part in raw_parts {
                if let Some(inline) = part.inline_data {
                    let data = RESPONSE_BASE64.decode(&inline.data)
                        .map_err(|e| ImageError::Api {
                            status: 200,
                            message: format!("Failed to decode base64: {e}"),
                        })?;
                    parts.push(Part::Image(ImagePayload::new(inline.mime_type, data)));
                } else if let Some(text) = part.text {
                    parts.push(Part::Text { text });
                }
            }

            tracing::debug!(parts = parts.len(), "Gemini response parsed");
            Ok(GenerationResponse { parts })
        })
    }
}

// --- Gemini API request types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiRequestContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiRequestContent {
    parts: Vec<GeminiRequestPart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_modalities: Vec<Modality>,
}

impl From<&GenerationRequest> for GeminiRequest {
    fn from(request: &GenerationRequest) -> Self {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                Part::Text { text } => GeminiRequestPart::Text { text: text.clone() },
                Part::Image(payload) => GeminiRequestPart::InlineData {
                    inline_data: GeminiInlineData {
                        mime_type: payload.mime_type().to_string(),
                        data: payload.base64_data(),
                    },
                },
            })
            .collect();
        Self {
            contents: vec![GeminiRequestContent { parts }],
            generation_config: GeminiGenerationConfig {
                response_modalities: request.response_modalities.clone(),
            },
        }
    }
}

// --- Gemini API response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    inline_data: Option<GeminiInlineData>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}
