//! Media-type policy for uploaded attachments.
//!
//! The media type of an upload is derived from its filename extension only;
//! the bytes are never sniffed. Each endpoint accepts one kind of media and
//! checks the derived type against that kind's allow-list before anything is
//! encoded or sent upstream.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Image media types accepted by the gateway.
pub const IMAGE_MEDIA_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/webp",
    "image/heic",
    "image/heif",
];

/// Audio media types accepted by the gateway.
pub const AUDIO_MEDIA_TYPES: &[&str] = &[
    "audio/wav",
    "audio/x-wav",
    "audio/mpeg",
    "audio/mp4",
    "audio/ogg",
];

/// Extensions whose registered type differs from what clients of the
/// gateway expect; consulted before the general lookup.
const EXTENSION_OVERRIDES: &[(&str, &str)] = &[
    ("m4a", "audio/mp4"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
];

/// Kind of media an endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
}

impl MediaKind {
    /// Multipart field carrying the file for this kind.
    pub fn field_name(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
        }
    }

    pub fn allow_list(self) -> AllowList {
        match self {
            MediaKind::Image => AllowList::IMAGE,
            MediaKind::Audio => AllowList::AUDIO,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Static set of accepted media types for one kind of media.
#[derive(Debug, Clone, Copy)]
pub struct AllowList {
    kind: MediaKind,
    media_types: &'static [&'static str],
}

impl AllowList {
    pub const IMAGE: AllowList = AllowList {
        kind: MediaKind::Image,
        media_types: IMAGE_MEDIA_TYPES,
    };

    pub const AUDIO: AllowList = AllowList {
        kind: MediaKind::Audio,
        media_types: AUDIO_MEDIA_TYPES,
    };

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn contains(&self, media_type: &str) -> bool {
        self.media_types.contains(&media_type)
    }
}

/// Upload rejected by the allow-list check.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unsupported {kind} format: {}", .media_type.as_deref().unwrap_or("unknown"))]
pub struct UnsupportedMediaType {
    pub kind: MediaKind,
    /// Type derived from the filename, `None` when it could not be derived.
    pub media_type: Option<String>,
}

/// Guess a media type from a filename extension.
pub fn media_type_from_filename(filename: &str) -> Option<String> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())?
        .to_ascii_lowercase();

    if let Some((_, media_type)) = EXTENSION_OVERRIDES
        .iter()
        .find(|(candidate, _)| *candidate == extension)
    {
        return Some((*media_type).to_string());
    }

    mime_guess::from_ext(&extension)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

/// An uploaded file as received, before any policy check.
#[derive(Debug, Clone)]
pub struct MediaAttachment {
    pub filename: Option<String>,
    pub bytes: Bytes,
}

impl MediaAttachment {
    pub fn new(filename: Option<String>, bytes: Bytes) -> Self {
        Self { filename, bytes }
    }

    /// Media type derived from the filename, if any.
    pub fn media_type(&self) -> Option<String> {
        self.filename.as_deref().and_then(media_type_from_filename)
    }

    /// Check the attachment against `allow_list`.
    ///
    /// This is the only way to obtain a [`ValidatedAttachment`].
    pub fn validate(self, allow_list: AllowList) -> Result<ValidatedAttachment, UnsupportedMediaType> {
        match self.media_type() {
            Some(media_type) if allow_list.contains(&media_type) => Ok(ValidatedAttachment {
                media_type,
                bytes: self.bytes,
            }),
            media_type => Err(UnsupportedMediaType {
                kind: allow_list.kind(),
                media_type,
            }),
        }
    }
}

/// Attachment whose media type passed the allow-list.
#[derive(Debug, Clone)]
pub struct ValidatedAttachment {
    media_type: String,
    bytes: Bytes,
}

impl ValidatedAttachment {
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard (padded) base64 of the attachment bytes.
    pub fn encode(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}
