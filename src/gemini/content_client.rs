use super::ModelGateway;
use crate::{
    config::GeminiConfig,
    error::{PosterError, Result},
    models::{ContentPart, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url(),
            self.config.model()
        )
    }

    pub async fn generate(&self, parts: &[ContentPart]) -> Result<String> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key.trim(),
            _ => return Err(PosterError::MissingCredential),
        };

        let payload = GenerateContentRequest::user(parts);

        log::info!("Invoking model: {}", self.config.model());
        log::debug!("Payload parts: {}", summarize_parts(parts));

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini request failed: {}", e);
                PosterError::GenerationFailure(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PosterError::GenerationFailure(e.to_string()))?;

        parse_response(status, &body)
    }
}

#[async_trait]
impl ModelGateway for GeminiClient {
    fn credential_configured(&self) -> bool {
        self.config.has_credential()
    }

    async fn invoke(&self, parts: &[ContentPart]) -> Result<String> {
        self.generate(parts).await
    }
}

/// Map a raw HTTP reply to prompt text or a generation failure carrying the
/// provider's message.
pub(crate) fn parse_response(status: StatusCode, body: &str) -> Result<String> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .map(|envelope| envelope.error.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status));
        log::error!("Gemini returned {}: {}", status, message);
        return Err(PosterError::GenerationFailure(message));
    }

    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| PosterError::GenerationFailure(format!("malformed response: {}", e)))?;

    if let Some(text) = parsed.text() {
        return Ok(text);
    }

    let reason = match (parsed.block_reason(), parsed.candidates.first()) {
        (Some(block), _) => format!("prompt was blocked ({})", block),
        (None, Some(candidate)) => format!(
            "no text in response (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        ),
        (None, None) => "no candidates in response".to_string(),
    };
    Err(PosterError::GenerationFailure(reason))
}

fn summarize_parts(parts: &[ContentPart]) -> String {
    parts
        .iter()
        .map(|part| match part {
            ContentPart::Text { text } => format!("text({} chars)", text.chars().count()),
            ContentPart::InlineImage { image } => {
                format!("{}({} b64 chars)", image.media_type, image.data.len())
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
