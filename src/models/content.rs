use super::EncodedImage;
use serde::{Deserialize, Serialize};

/// One unit of the multimodal payload. Serializes to the Gemini part shape:
/// `{"text": ...}` or `{"inlineData": {"mimeType": ..., "data": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    Text {
        text: String,
    },
    InlineImage {
        #[serde(rename = "inlineData")]
        image: EncodedImage,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image(image: EncodedImage) -> Self {
        ContentPart::InlineImage { image }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text { text } => Some(text),
            ContentPart::InlineImage { .. } => None,
        }
    }

    pub fn as_image(&self) -> Option<&EncodedImage> {
        match self {
            ContentPart::Text { .. } => None,
            ContentPart::InlineImage { image } => Some(image),
        }
    }
}
