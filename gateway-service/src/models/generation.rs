//! Provider-neutral generation request.

use crate::media::ValidatedAttachment;
use serde::Serialize;

/// One element of a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    InlineData {
        media_type: String,
        /// Base64 of the attachment bytes.
        data: String,
    },
}

/// Ordered parts sent to the model for one gateway call.
///
/// Built only from an attachment that already passed the allow-list, so a
/// request for an unsupported media type cannot exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    parts: Vec<Part>,
}

impl GenerationRequest {
    /// `[text?, media]`, with the text part first when present.
    pub fn new(text: Option<String>, attachment: &ValidatedAttachment) -> Self {
        let mut parts = Vec::with_capacity(2);
        if let Some(text) = text {
            parts.push(Part::Text(text));
        }
        parts.push(Part::InlineData {
            media_type: attachment.media_type().to_string(),
            data: attachment.encode(),
        });
        Self { parts }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }
}

/// Successful gateway reply.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResponse {
    pub response: String,
}
