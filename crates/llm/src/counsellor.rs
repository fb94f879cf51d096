//! The counsellor service: prompt, one generation attempt, fallback.

use std::sync::Arc;

use pathway_core::counsellor::{
    conversation_prompt, fallback_reply, generated_reply, ChatContext, ChatReply,
    ProfileSnapshot,
};
use pathway_core::voice::{fallback_turn, parse_model_reply, voice_prompt, VoiceReply};

use crate::config::LlmConfig;
use crate::error::GenerationError;
use crate::gemini::GeminiClient;
use crate::generator::TextGenerator;

/// Conversational assistant. Constructed once at startup and shared.
///
/// Without a generator every reply comes from the keyword fallback. With
/// one, any generation failure is logged and answered by the fallback, so
/// callers never see an error.
pub struct Counsellor {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl Counsellor {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    /// A counsellor that only ever uses canned replies.
    pub fn fallback_only() -> Self {
        Self::new(None)
    }

    /// Build from configuration. No API key means fallback only.
    pub fn from_config(config: &LlmConfig) -> Result<Self, GenerationError> {
        if config.api_key.is_none() {
            return Ok(Self::fallback_only());
        }
        let client = GeminiClient::from_config(config)?;
        tracing::info!(model = client.model(), "Text generation enabled");
        Ok(Self::new(Some(Arc::new(client))))
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        match &self.generator {
            Some(generator) => generator.generate(prompt).await,
            None => Err(GenerationError::NotConfigured),
        }
    }

    /// Reply to a chat message in context.
    pub async fn chat(&self, message: &str, context: &ChatContext) -> ChatReply {
        if !self.has_generator() {
            return fallback_reply(message, context);
        }

        let prompt = conversation_prompt(context, message);
        match self.generate(&prompt).await {
            Ok(text) => generated_reply(text.trim().to_string(), context),
            Err(e) => {
                tracing::warn!(error = %e, "Chat generation failed, using fallback reply");
                fallback_reply(message, context)
            }
        }
    }

    /// Process one voice onboarding turn.
    pub async fn voice_onboarding(
        &self,
        transcript: &str,
        current_step: Option<&str>,
        profile: &ProfileSnapshot,
    ) -> VoiceReply {
        if !self.has_generator() {
            return fallback_turn(transcript, current_step);
        }

        let prompt = voice_prompt(transcript, current_step, profile);
        let parsed = self
            .generate(&prompt)
            .await
            .and_then(|text| parse_model_reply(&text).map_err(GenerationError::Malformed));

        match parsed {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "Voice onboarding generation failed, using fallback");
                fallback_turn(transcript, current_step)
            }
        }
    }
}
