pub mod content_client;

use crate::{error::Result, models::ContentPart};
use async_trait::async_trait;

pub use content_client::GeminiClient;

/// The remote model that turns an assembled payload into prompt text.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Whether an API credential is available. Checked before any network call.
    fn credential_configured(&self) -> bool;

    /// One round trip: submit the parts, return the model's text.
    async fn invoke(&self, parts: &[ContentPart]) -> Result<String>;
}
