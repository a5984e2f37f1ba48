//! Image payloads and the `data:<mime>;base64,<payload>` encoding.

use base64::Engine;
use serde::{Deserialize, Serialize};

/// Raw image bytes tagged with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    mime_type: String,
    #[serde(with = "base64_bytes")]
    data: Vec<u8>,
}

impl ImagePayload {
    /// Create a payload from a MIME type and raw bytes.
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self { mime_type: mime_type.into(), data }
    }

    /// Parse a data URL into a payload.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the string is not a
    /// base64 data URL with a MIME type, or the payload does not decode.
    pub fn from_data_url(data_url: &str) -> Result<Self, String> {
        let (mime_type, payload) = split(data_url)?;
        let data = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| format!("payload is not valid base64: {e}"))?;
        Ok(Self::new(mime_type, data))
    }

    /// Encode as `data:<mime>;base64,<payload>`.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        assemble(&self.mime_type, &self.base64_data())
    }

    /// The MIME type, e.g. `image/png`.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The decoded bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The bytes as standard base64.
    #[must_use]
    pub fn base64_data(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Whether the MIME type is in the `image/` family.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Split a data URL into its MIME type and base64 payload.
///
/// Media type parameters (`;charset=...`) are dropped from the MIME type.
///
/// # Errors
///
/// Returns a description of the first missing delimiter.
pub fn split(data_url: &str) -> Result<(&str, &str), String> {
    let rest = data_url.strip_prefix("data:").ok_or("missing `data:` scheme")?;
    let (meta, payload) = rest.split_once(',').ok_or("missing `,` before the payload")?;
    let meta = meta.strip_suffix(";base64").ok_or("payload is not marked `;base64`")?;
    let mime_type = meta.split(';').next().unwrap_or_default().trim();
    if mime_type.is_empty() {
        return Err("missing MIME type".to_string());
    }
    Ok((mime_type, payload))
}

/// Join a MIME type and base64 payload into a data URL.
#[must_use]
pub fn assemble(mime_type: &str, payload: &str) -> String {
    format!("data:{mime_type};base64,{payload}")
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as base64 string.
    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    /// Deserialize base64 string to bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}
