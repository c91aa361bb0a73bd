//! Validated primitive types shared across the prescription service.
//!
//! Values are checked once at the edge of the system (request bodies, headers, CLI arguments) and
//! then passed around as types that cannot hold invalid content.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// MIME type assumed when an image declares none and its bytes are not recognised.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A trimmed string with at least one non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Trims `input` and rejects it when nothing remains.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        match input.as_ref().trim() {
            "" => Err(TextError::Empty),
            trimmed => Ok(Self(trimmed.to_owned())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Errors raised while validating an inbound image payload.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("No image provided")]
    Empty,
    #[error("image is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// An image ready to be sent inline to a vision model.
///
/// Accepts either a data URI (`data:image/png;base64,....`) or a bare base64 string. Anything up
/// to and including the first comma is treated as the URI prefix and removed, so the payload held
/// here is always bare base64.
///
/// The MIME type comes from the data URI when one is declared. Otherwise the decoded bytes are
/// sniffed, and [`DEFAULT_IMAGE_MIME`] is used when they are not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    mime_type: String,
    data: String,
    decoded_len: usize,
}

impl ImagePayload {
    pub fn parse(input: &str) -> Result<Self, ImageError> {
        let input = input.trim();
        let (declared_mime, data) = match input.split_once(',') {
            Some((prefix, data)) => (declared_mime(prefix), data.trim()),
            None => (None, input),
        };

        // Line-wrapped base64 (e.g. MIME or `base64` CLI output) is accepted.
        let data: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        if data.is_empty() {
            return Err(ImageError::Empty);
        }

        let bytes = BASE64.decode(&data)?;
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        let mime_type = declared_mime
            .or_else(|| {
                infer::get(&bytes)
                    .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
                    .map(|kind| kind.mime_type().to_owned())
            })
            .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_owned());

        Ok(Self {
            mime_type,
            data,
            decoded_len: bytes.len(),
        })
    }

    /// Builds a payload from raw bytes, e.g. a file read by the CLI.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        Self::parse(&BASE64.encode(bytes))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Bare base64 content, without any data-URI prefix.
    pub fn base64_data(&self) -> &str {
        &self.data
    }

    pub fn decoded_len(&self) -> usize {
        self.decoded_len
    }
}

/// `data:image/png;base64` -> `image/png`
fn declared_mime(prefix: &str) -> Option<String> {
    let rest = prefix.trim().strip_prefix("data:")?;
    let mime = rest.split(';').next()?.trim();
    if mime.is_empty() || !mime.contains('/') {
        return None;
    }
    Some(mime.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn non_empty_text_trims() {
        let text = NonEmptyText::new("  Amoxicillin \n").unwrap();
        assert_eq!(text.as_str(), "Amoxicillin");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert!(matches!(NonEmptyText::new(" \t "), Err(TextError::Empty)));
    }

    #[test]
    fn non_empty_text_deserialize_rejects_empty() {
        assert!(serde_json::from_str::<NonEmptyText>("\"   \"").is_err());
        let ok: NonEmptyText = serde_json::from_str("\" user-1 \"").unwrap();
        assert_eq!(ok.as_str(), "user-1");
    }

    #[test]
    fn data_uri_prefix_is_stripped_and_mime_kept() {
        let payload = ImagePayload::parse(&format!("data:image/png;base64,{PNG_B64}")).unwrap();
        assert_eq!(payload.mime_type(), "image/png");
        assert_eq!(payload.base64_data(), PNG_B64);
    }

    #[test]
    fn bare_base64_is_sniffed() {
        let payload = ImagePayload::parse(PNG_B64).unwrap();
        assert_eq!(payload.mime_type(), "image/png");
        assert!(payload.decoded_len() > 0);
    }

    #[test]
    fn unrecognised_bytes_default_to_jpeg() {
        let payload = ImagePayload::parse(&BASE64.encode(b"not really an image")).unwrap();
        assert_eq!(payload.mime_type(), DEFAULT_IMAGE_MIME);
    }

    #[test]
    fn empty_and_prefix_only_inputs_are_rejected() {
        assert!(matches!(ImagePayload::parse(""), Err(ImageError::Empty)));
        assert!(matches!(
            ImagePayload::parse("data:image/png;base64,"),
            Err(ImageError::Empty)
        ));
    }

    #[test]
    fn line_wrapped_base64_is_unwrapped() {
        let (head, tail) = PNG_B64.split_at(40);
        let payload =
            ImagePayload::parse(&format!("data:image/png;base64,{head}\r\n{tail}\n")).unwrap();
        assert_eq!(payload.base64_data(), PNG_B64);
        assert_eq!(payload.mime_type(), "image/png");
    }

    #[test]
    fn invalid_base64_is_rejected() {
        assert!(matches!(
            ImagePayload::parse("data:image/png;base64,@@@not-base64@@@"),
            Err(ImageError::InvalidBase64(_))
        ));
    }

    #[test]
    fn from_bytes_round_trips_mime() {
        let bytes = BASE64.decode(PNG_B64).unwrap();
        let payload = ImagePayload::from_bytes(&bytes).unwrap();
        assert_eq!(payload.mime_type(), "image/png");
        assert_eq!(payload.decoded_len(), bytes.len());
    }
}
