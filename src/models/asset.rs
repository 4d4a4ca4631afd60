use crate::error::{PosterError, Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// The only image formats the generator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
}

impl MediaType {
    pub fn as_mime(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
        }
    }

    /// Exact match on `image/jpeg` or `image/png`; anything else is rejected.
    pub fn from_mime(mime: &str) -> std::result::Result<Self, ValidationError> {
        match mime {
            "image/jpeg" => Ok(MediaType::Jpeg),
            "image/png" => Ok(MediaType::Png),
            other => Err(ValidationError::UnsupportedMediaType(other.to_string())),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// Raw image bytes plus their media type. Immutable once created; clones
/// share the underlying buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    bytes: Arc<[u8]>,
    media_type: MediaType,
}

impl ImageAsset {
    pub fn new(bytes: impl Into<Vec<u8>>, media_type: MediaType) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            bytes: Arc::from(bytes),
            media_type,
        }
    }

    /// Build an asset from a MIME string reported by the caller, rejecting
    /// anything that is not JPEG or PNG.
    pub fn from_mime(bytes: impl Into<Vec<u8>>, mime: &str) -> Result<Self> {
        let media_type = MediaType::from_mime(mime)?;
        Ok(Self::new(bytes, media_type))
    }

    /// Read an image from disk. The media type is sniffed from the file
    /// contents, not the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            PosterError::IoError(format!("failed to read {}: {}", path.display(), e))
        })?;

        let mime = infer::get(&bytes)
            .map(|kind| kind.mime_type())
            .unwrap_or("application/octet-stream");

        log::debug!(
            "Loaded {} ({} bytes, detected {})",
            path.display(),
            bytes.len(),
            mime
        );

        Self::from_mime(bytes, mime)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Transport form of an image: standard padded base64 plus media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    #[serde(rename = "mimeType")]
    pub media_type: MediaType,
    pub data: String,
}
