use crate::{
    builder,
    config::GeminiConfig,
    error::{PosterError, Result, ValidationError},
    form::{FormState, SubmissionTicket},
    gemini::{GeminiClient, ModelGateway},
    logger,
    models::GenerationRequest,
    templates,
};

const UNKNOWN_FAILURE: &str = "An unknown error occurred.";

/// Entry point for front ends: validates form state and turns requests into
/// prompt text through a [`ModelGateway`].
pub struct PosterClient<G: ModelGateway = GeminiClient> {
    gateway: G,
}

impl PosterClient<GeminiClient> {
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_gateway(GeminiClient::new(config))
    }

    pub fn from_env() -> Self {
        Self::new(GeminiConfig::from_env())
    }
}

impl<G: ModelGateway> PosterClient<G> {
    pub fn with_gateway(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn build_request(
        &self,
        form: &FormState,
    ) -> std::result::Result<GenerationRequest, ValidationError> {
        builder::build_request(form)
    }

    /// One generation attempt: either the full prompt text or an error, never
    /// anything partial.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        if !self.gateway.credential_configured() {
            log::error!("Gemini API key is not set");
            return Err(PosterError::MissingCredential);
        }

        log::info!(
            "Generating {} poster prompt from {} image(s)",
            request.mode_label(),
            request.image_count()
        );
        let _timer = logger::timer("poster prompt generation");

        let parts = templates::build_call_payload_concurrent(request).await?;

        match self.gateway.invoke(&parts).await {
            Ok(text) => {
                log::info!("Received prompt ({} chars)", text.chars().count());
                Ok(text)
            }
            Err(PosterError::MissingCredential) => Err(PosterError::MissingCredential),
            Err(PosterError::GenerationFailure(msg)) => Err(generation_failure(msg)),
            Err(other) => Err(generation_failure(other.to_string())),
        }
    }

    /// Validate the form and claim a ticket for the submission. The form is
    /// not borrowed past this call, so front ends that let submissions
    /// overlap run `generate` themselves and hand the result to
    /// [`PosterClient::finish`].
    pub fn begin(
        &self,
        form: &mut FormState,
    ) -> std::result::Result<(SubmissionTicket, GenerationRequest), ValidationError> {
        let request = self.build_request(form)?;
        Ok((form.begin_submission(), request))
    }

    /// Store a prompt in the form's slot. Returns false when a newer
    /// submission has started since `ticket` was issued; the prompt is then
    /// dropped.
    pub fn finish(&self, form: &mut FormState, ticket: SubmissionTicket, prompt: String) -> bool {
        let stored = form.complete(ticket, prompt);
        if !stored {
            log::warn!("Discarded a stale poster prompt; a newer submission is pending");
        }
        stored
    }

    /// Build, generate and store the result in the form's prompt slot.
    ///
    /// Holds the form for the whole round trip, so calls on one form never
    /// overlap; use [`PosterClient::begin`] and [`PosterClient::finish`] when
    /// they should.
    pub async fn submit(&self, form: &mut FormState) -> Result<String> {
        let (ticket, request) = self.begin(form)?;
        let prompt = self.generate(&request).await?;
        self.finish(form, ticket, prompt.clone());
        Ok(prompt)
    }
}

fn generation_failure(message: String) -> PosterError {
    if message.trim().is_empty() {
        PosterError::GenerationFailure(UNKNOWN_FAILURE.to_string())
    } else {
        PosterError::GenerationFailure(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentPart, ImageAsset, MediaType};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MockGateway {
        credential: bool,
        reply: std::result::Result<String, String>,
        calls: AtomicUsize,
        last_parts: Mutex<Vec<ContentPart>>,
    }

    impl MockGateway {
        fn replying(text: &str) -> Self {
            Self {
                credential: true,
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                last_parts: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                ..Self::replying("")
            }
        }

        fn without_credential() -> Self {
            Self {
                credential: false,
                ..Self::replying("unused")
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelGateway for MockGateway {
        fn credential_configured(&self) -> bool {
            self.credential
        }

        async fn invoke(&self, parts: &[ContentPart]) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_parts.lock().unwrap() = parts.to_vec();
            self.reply
                .clone()
                .map_err(PosterError::GenerationFailure)
        }
    }

    fn png(tag: u8) -> ImageAsset {
        ImageAsset::new(vec![0x89, tag], MediaType::Png)
    }

    fn style_only() -> GenerationRequest {
        GenerationRequest::StyleOnly {
            style: png(0),
            description: "A vintage travel poster for Mars".into(),
        }
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_calls() {
        let client = PosterClient::with_gateway(MockGateway::without_credential());
        let err = client.generate(&style_only()).await.unwrap_err();

        assert!(matches!(err, PosterError::MissingCredential));
        assert_eq!(client.gateway().calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_message_is_kept() {
        let client = PosterClient::with_gateway(MockGateway::failing("rate limited"));
        let err = client.generate(&style_only()).await.unwrap_err();

        assert_eq!(err.failure_message(), Some("rate limited"));
        assert_eq!(client.gateway().calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_failure_gets_fallback_message() {
        let client = PosterClient::with_gateway(MockGateway::failing(""));
        let err = client.generate(&style_only()).await.unwrap_err();
        assert_eq!(err.failure_message(), Some(UNKNOWN_FAILURE));
    }

    #[tokio::test]
    async fn test_success_sends_two_parts_for_style_only() {
        let client = PosterClient::with_gateway(MockGateway::replying("Retro Mars poster"));
        let text = client.generate(&style_only()).await.unwrap();

        assert_eq!(text, "Retro Mars poster");
        assert_eq!(client.gateway().calls(), 1);
        assert_eq!(client.gateway().last_parts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_group_of_three() {
        let client = PosterClient::with_gateway(MockGateway::replying("Group shot"));
        let mut form = FormState::new();
        form.select_style(png(0));
        form.toggle_composite();
        form.toggle_group();
        form.select_group(vec![png(1), png(2), png(3)]);
        form.set_description("Band poster");

        let prompt = client.submit(&mut form).await.unwrap();
        assert_eq!(prompt, "Group shot");
        assert_eq!(form.generated_prompt(), Some("Group shot"));

        let parts = client.gateway().last_parts.lock().unwrap().clone();
        assert_eq!(parts.len(), 5);
        assert!(parts[0].as_text().unwrap().contains("3"));
    }

    #[tokio::test]
    async fn test_submit_validation_error_skips_gateway() {
        let client = PosterClient::with_gateway(MockGateway::replying("unused"));
        let mut form = FormState::new();
        form.set_description("No style image yet");

        let err = client.submit(&mut form).await.unwrap_err();
        assert!(matches!(
            err,
            PosterError::Validation(ValidationError::MissingStyleImage)
        ));
        assert_eq!(client.gateway().calls(), 0);
        assert!(form.generated_prompt().is_none());
    }

    #[tokio::test]
    async fn test_overlapping_submissions_keep_newest() {
        let client = PosterClient::with_gateway(MockGateway::replying("unused"));
        let mut form = FormState::new();
        form.select_style(png(0));
        form.set_description("Jazz night");

        let (first, first_request) = client.begin(&mut form).unwrap();
        let (second, second_request) = client.begin(&mut form).unwrap();
        let newer = client.generate(&second_request).await.unwrap();
        let older = client.generate(&first_request).await.unwrap();

        assert!(client.finish(&mut form, second, format!("{newer} (second)")));
        assert!(!client.finish(&mut form, first, format!("{older} (first)")));
        assert_eq!(form.generated_prompt(), Some("unused (second)"));
        assert_eq!(client.gateway().calls(), 2);
    }

    #[tokio::test]
    async fn test_real_client_without_key() {
        let client = PosterClient::new(GeminiConfig::new());
        let err = client.generate(&style_only()).await.unwrap_err();
        assert!(matches!(err, PosterError::MissingCredential));
    }
}
