//! Conversion between data URLs and the `{payload, mime_type}` pairs sent to
//! the model as inline image parts.

use super::mime::{detect_image_mime, DEFAULT_IMAGE_MIME};
use crate::{Error, Result};
use base64::Engine as _;

/// An image ready to attach to a request: base64 payload plus MIME type.
///
/// The payload is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    payload: String,
    mime_type: String,
}

impl EncodedImage {
    /// Parse a `data:<mime>;base64,<payload>` string.
    ///
    /// The MIME type is whatever sits between the first `:` and the first `;`
    /// of the header; an empty segment becomes `image/png`. Unknown MIME types
    /// are accepted as-is.
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let (header, payload) = data_url.split_once(',').ok_or_else(|| {
            Error::MalformedImageInput("missing ',' between header and payload".to_string())
        })?;

        let colon = header.find(':');
        let semicolon = header.find(';');
        let mime_type = match (colon, semicolon) {
            (Some(c), Some(s)) if c < s => header[c + 1..s].trim(),
            _ => {
                return Err(Error::MalformedImageInput(format!(
                    "header '{}' has no ':' ... ';' MIME segment",
                    header
                )))
            }
        };

        if payload.is_empty() {
            return Err(Error::MalformedImageInput("empty payload".to_string()));
        }

        let mime_type = if mime_type.is_empty() {
            DEFAULT_IMAGE_MIME
        } else {
            mime_type
        };

        Ok(Self {
            payload: payload.to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    /// Encode raw file bytes, sniffing the MIME type from the magic number.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::MalformedImageInput("empty image file".to_string()));
        }
        Ok(Self {
            payload: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: detect_image_mime(bytes).to_string(),
        })
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn to_data_url(&self) -> String {
        data_url(&self.mime_type, &self.payload)
    }

    /// Decode the base64 payload back into raw bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(base64::engine::general_purpose::STANDARD.decode(&self.payload)?)
    }
}

pub fn data_url(mime_type: &str, payload: &str) -> String {
    format!("data:{};base64,{}", mime_type, payload)
}
