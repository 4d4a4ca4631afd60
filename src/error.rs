use thiserror::Error;

/// Problems with the user's selections, detected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please upload a Style Reference image.")]
    MissingStyleImage,
    #[error("Please enter a description for your poster.")]
    MissingDescription,
    #[error("Pro Mode is ON. Please upload an image of the person you want to composite.")]
    MissingPersonImage,
    #[error("Group Mode is ON. Please upload at least one person image.")]
    MissingGroupImages,
    #[error("Please upload a valid JPG or PNG image (got {0}).")]
    UnsupportedMediaType(String),
}

impl ValidationError {
    /// Short heading shown above the message.
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::MissingStyleImage => "Missing Style Image",
            ValidationError::MissingDescription => "Missing Description",
            ValidationError::MissingPersonImage => "Missing Person Image",
            ValidationError::MissingGroupImages => "Missing Images",
            ValidationError::UnsupportedMediaType(_) => "Invalid File Type",
        }
    }
}

#[derive(Debug, Error)]
pub enum PosterError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("API key not configured. Please add your Gemini API key (GEMINI_API_KEY) to the environment or a .env file.")]
    MissingCredential,
    #[error("Generation failed: {0}")]
    GenerationFailure(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Decode error: {0}")]
    DecodeError(String),
    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl PosterError {
    /// The bare message of a generation failure, without the display prefix.
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            PosterError::GenerationFailure(msg) => Some(msg),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PosterError {
    fn from(e: std::io::Error) -> Self {
        PosterError::IoError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PosterError>;
