//! Build image-generation prompts from a style reference, optional person
//! photos and a short description, using Gemini to do the analysis.
//!
//! ```no_run
//! use postergen::{FormState, ImageAsset, PosterClient};
//!
//! # async fn run() -> postergen::Result<()> {
//! let client = PosterClient::from_env();
//! let mut form = FormState::new();
//! form.select_style(ImageAsset::from_path("style.png")?);
//! form.set_description("A vintage travel poster for Mars");
//!
//! let request = client.build_request(&form)?;
//! let prompt = client.generate(&request).await?;
//! println!("{}", prompt);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod encoder;
pub mod error;
pub mod form;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod templates;

pub use client::PosterClient;
pub use config::GeminiConfig;
pub use error::{PosterError, Result, ValidationError};
pub use form::{FormState, PreviewHandle, PreviewRegistry, SubmissionTicket};
pub use gemini::{GeminiClient, ModelGateway};
pub use models::{ContentPart, EncodedImage, GenerationRequest, ImageAsset, MediaType, ModeFlags};
