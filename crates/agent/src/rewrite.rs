//! Query rewriting — reformulate a query to retrieve better evidence.
//!
//! One completion call, a pure function of the query alone: the rewriter
//! deliberately sees neither the failed documents nor the conversation
//! history. Never recursive.

use crate::prompts;
use podchat_core::error::ProviderError;
use podchat_core::message::Message;
use podchat_core::provider::{CompletionRequest, Provider};
use std::sync::Arc;
use tracing::debug;

/// Produces a new query string intended to improve retrieval recall.
pub struct QueryRewriter {
    provider: Arc<dyn Provider>,
    model: String,
}

impl QueryRewriter {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Rewrite the query. The input is never mutated; a new string is
    /// returned.
    pub async fn rewrite(&self, query: &str) -> Result<String, ProviderError> {
        let request = CompletionRequest::text(
            &self.model,
            vec![
                Message::system(prompts::QUERY_REWRITER),
                Message::user(format!("previous query: {query}")),
            ],
        );

        let response = self.provider.complete(request).await?;
        let rewritten = response.message.content.trim().to_string();
        debug!(from = %query, to = %rewritten, "Rewrote query");
        Ok(rewritten)
    }
}
