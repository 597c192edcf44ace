//! Declared media types and the raw upload buffer.

use std::fmt;

/// Media type declared by the uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaType {
    /// `image/jpeg` (or the non-standard `image/jpg`).
    Jpeg,
    /// `image/png`.
    Png,
    /// `image/webp`.
    Webp,
    /// Anything else, kept verbatim.
    Other(String),
}

impl MediaType {
    /// Parse a MIME string. Unknown types are preserved as [`MediaType::Other`].
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        let normalized = mime.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/png" => Self::Png,
            "image/webp" => Self::Webp,
            _ => Self::Other(normalized),
        }
    }

    /// Guess the media type from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "webp" => Self::Webp,
            "gif" => Self::Other("image/gif".to_string()),
            _ => Self::Other("application/octet-stream".to_string()),
        }
    }

    /// Canonical MIME string.
    #[must_use]
    pub fn as_mime(&self) -> &str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Other(mime) => mime,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// Raw encoded image bytes as received from the upload, plus their declared type.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    data: Vec<u8>,
    media_type: MediaType,
}

impl ImageBuffer {
    /// Wrap uploaded bytes.
    #[must_use]
    pub fn new(data: Vec<u8>, media_type: MediaType) -> Self {
        Self { data, media_type }
    }

    /// The encoded bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The declared media type.
    #[must_use]
    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    /// Size of the encoded bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
