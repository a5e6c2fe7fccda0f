//! Answer generation — the podcast-host persona reply.
//!
//! One completion per call. The evidence set rides in the user message as
//! markdown excerpts; citations come out as `[(timestamp)](url)` built only
//! from fields present in the evidence.

use crate::prompts;
use podchat_core::document::DocumentSet;
use podchat_core::error::ProviderError;
use podchat_core::message::Message;
use podchat_core::provider::{CompletionRequest, Provider};
use std::sync::Arc;
use tracing::info;

/// Generates answers attributed to the retrieved evidence.
pub struct AnswerGenerator {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnswerGenerator {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Generate one answer for the (query, intent, emotion, evidence,
    /// history) tuple. Each call produces a fresh answer; the pipeline
    /// discards superseded ones.
    pub async fn generate(
        &self,
        query: &str,
        intent: &str,
        emotion: &str,
        evidence: &DocumentSet,
        history: &str,
    ) -> Result<String, ProviderError> {
        let user = format!(
            "Documents:\n{}\n\nConversation history: {}\n\nQuery: {}\nUser Intent: {}\nanswer with output emotion: {}",
            evidence.render_evidence(),
            history,
            query,
            intent,
            emotion,
        );

        let request = CompletionRequest::text(
            &self.model,
            vec![Message::system(prompts::ANSWER_GENERATOR), Message::user(user)],
        )
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens);

        let response = self.provider.complete(request).await?;
        let answer = response.message.content;

        info!(
            documents = evidence.len(),
            answer_len = answer.len(),
            "Generated answer"
        );

        Ok(answer)
    }
}
