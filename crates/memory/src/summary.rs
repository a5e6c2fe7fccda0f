//! Turn summarization — condense an assistant reply into one facts line.
//!
//! The digest keeps who spoke, what was said, and the `[timestamp](url)`
//! citation so later turns can answer from history without re-retrieval.

use podchat_core::error::MemoryError;
use podchat_core::message::Message;
use podchat_core::provider::{CompletionRequest, Provider};
use std::sync::Arc;
use tracing::debug;

const SUMMARY_PROMPT: &str = "\
You are an expert transcriber. you will summarise a text containing a reply from a podcast host. \
Your summary must contain what was spoken, who spoke about it and the timestamp and url in the format [timestamp](url).
provide only the summary and nothing else.";

/// Summarizes assistant replies on a fast model.
pub struct TurnSummarizer {
    provider: Arc<dyn Provider>,
    model: String,
}

impl TurnSummarizer {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Produce the one-line digest of an assistant reply.
    pub async fn summarize(&self, reply: &str) -> Result<String, MemoryError> {
        let request = CompletionRequest::text(
            &self.model,
            vec![Message::system(SUMMARY_PROMPT), Message::user(reply)],
        );

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| MemoryError::SummarizationFailed(e.to_string()))?;

        let summary = response.message.content.trim().to_string();
        debug!(len = summary.len(), "Summarized turn");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use podchat_core::error::ProviderError;
    use podchat_core::provider::CompletionResponse;

    struct StubProvider {
        reply: Option<String>,
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, ProviderError> {
            match &self.reply {
                Some(text) => Ok(CompletionResponse {
                    message: Message::assistant(text.clone()),
                    usage: None,
                    model: "stub".into(),
                }),
                None => Err(ProviderError::Network("connection reset".into())),
            }
        }
    }

    #[tokio::test]
    async fn summarize_trims_response() {
        let summarizer = TurnSummarizer::new(
            Arc::new(StubProvider {
                reply: Some("  Alice covered rate hikes [(00:14:02)](https://y.t/abc)\n".into()),
            }),
            "fast-model",
        );
        let summary = summarizer.summarize("long reply...").await.unwrap();
        assert_eq!(
            summary,
            "Alice covered rate hikes [(00:14:02)](https://y.t/abc)"
        );
    }

    #[tokio::test]
    async fn provider_failure_maps_to_memory_error() {
        let summarizer =
            TurnSummarizer::new(Arc::new(StubProvider { reply: None }), "fast-model");
        let err = summarizer.summarize("reply").await.unwrap_err();
        assert!(matches!(err, MemoryError::SummarizationFailed(_)));
    }
}
