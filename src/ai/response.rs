//! Unwrapping of `generateContent` replies.
//!
//! Order of precedence: the first inline image wins; otherwise a text part is
//! the model explaining why it did not draw (surfaced as
//! [`Error::ModelRefusal`]); otherwise the reply is unusable.

use super::codec::data_url;
use super::gemini::types::{GenerateContentResponse, ResponsePart};
use super::mime::DEFAULT_IMAGE_MIME;
use crate::{Error, Result};

fn first_candidate_parts(response: &GenerateContentResponse) -> Option<&[ResponsePart]> {
    let parts = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| content.parts.as_slice())?;
    if parts.is_empty() {
        None
    } else {
        Some(parts)
    }
}

fn log_block_reason(response: &GenerateContentResponse) {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        tracing::warn!("Gemini blocked the prompt: {}", reason);
    }
}

/// Return the first inline image of the first candidate as a data URL.
pub fn extract_image(response: &GenerateContentResponse) -> Result<String> {
    let Some(parts) = first_candidate_parts(response) else {
        log_block_reason(response);
        return Err(Error::EmptyResponse);
    };

    let image = parts
        .iter()
        .filter_map(|p| p.inline_data.as_ref())
        .find(|inline| !inline.data.is_empty());

    if let Some(inline) = image {
        let mime_type = inline
            .mime_type
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_IMAGE_MIME);
        tracing::debug!("Gemini returned image with mime_type: {}", mime_type);
        return Ok(data_url(mime_type, &inline.data));
    }

    if let Some(text) = parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .find(|t| !t.is_empty())
    {
        return Err(Error::ModelRefusal(text.to_string()));
    }

    Err(Error::NoImageProduced)
}

/// Concatenate the text parts of the first candidate.
///
/// A reply with no text yields an empty string; only a reply with no parts at
/// all is an error.
pub fn extract_text(response: &GenerateContentResponse) -> Result<String> {
    let Some(parts) = first_candidate_parts(response) else {
        log_block_reason(response);
        return Err(Error::EmptyResponse);
    };

    Ok(parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join(""))
}
