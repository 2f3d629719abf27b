//! Decoding of inline attachment payloads.

use super::{Attachment, AttachmentError};
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};
use tracing::warn;

const DEFAULT_MIME_TYPE: &str = "text/plain";
const DATA_URI_SCHEME: &str = "data:";

/// Standard alphabet, accepting payloads with or without trailing padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Attachment whose payload has been decoded to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedAttachment {
    /// File name of the attachment.
    pub name: String,
    /// MIME type declared by the data URI, `text/plain` when absent.
    pub mime_type: String,
    /// Decoded textual content.
    pub content: String,
}

impl DecodedAttachment {
    /// Creates a decoded attachment from its parts.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content: content.into(),
        }
    }

    /// Creates an empty `text/plain` placeholder for an attachment.
    #[must_use]
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_MIME_TYPE, String::new())
    }

    /// Decodes an attachment, degrading to a placeholder when the payload is
    /// absent or cannot be decoded.
    #[must_use]
    pub fn from_attachment(attachment: &Attachment) -> Self {
        if attachment.url.trim().is_empty() {
            return Self::placeholder(attachment.name.clone());
        }
        match parse_data_uri(&attachment.url) {
            Ok((mime_type, content)) => Self::new(attachment.name.clone(), mime_type, content),
            Err(error) => {
                warn!(
                    attachment = %attachment.name,
                    error = %error,
                    "attachment payload not decodable, using empty placeholder"
                );
                Self::placeholder(attachment.name.clone())
            }
        }
    }

    /// Returns `true` when the file name ends with the given extension.
    #[must_use]
    pub fn has_extension(&self, extension: &str) -> bool {
        self.name
            .strip_suffix(extension)
            .is_some_and(|stem| stem.ends_with('.'))
    }
}

/// Parses a `data:` URI into its MIME type and textual payload.
///
/// Payloads flagged `;base64` are base64-decoded and converted to text with
/// lossy UTF-8; other payloads are taken as-is. Base64 payloads may omit
/// padding and may be wrapped across lines.
///
/// # Errors
///
/// Returns [`AttachmentError`] when the value is not a data URI, lacks the
/// payload separator, or carries invalid base64.
pub fn parse_data_uri(uri: &str) -> Result<(String, String), AttachmentError> {
    let body = uri
        .trim()
        .strip_prefix(DATA_URI_SCHEME)
        .ok_or(AttachmentError::NotDataUri)?;
    let (header, payload) = body
        .split_once(',')
        .ok_or(AttachmentError::MissingPayloadSeparator)?;

    let mut parameters = header.split(';');
    let mime_type = parameters
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_owned();
    let is_base64 = parameters.any(|parameter| parameter.trim().eq_ignore_ascii_case("base64"));

    if !is_base64 {
        return Ok((mime_type, payload.to_owned()));
    }

    let compact: String = payload
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect();
    let bytes = LENIENT_BASE64
        .decode(compact)
        .map_err(|error| AttachmentError::InvalidBase64(error.to_string()))?;
    Ok((mime_type, String::from_utf8_lossy(&bytes).into_owned()))
}
