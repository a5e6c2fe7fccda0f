//! Entity extraction — keyword conditions for hybrid search.
//!
//! One fast-model completion turns the query into a comma-separated entity
//! list. The entities become full-text `should` conditions on the index
//! search.

use podchat_core::error::RetrievalError;
use podchat_core::message::Message;
use podchat_core::provider::{CompletionRequest, Provider};
use std::sync::Arc;
use tracing::debug;

const ENTITY_PROMPT: &str = "\
Your task is to analyse the query and identify the entities in the query.
The output must contain only the entities separated by comma and no other details.
Do not share anything other than what you are asked to.
You must strictly follow the instruction.
only provide the keywords found and nothing else.";

/// Extracts the entities mentioned in a query.
pub struct EntityExtractor {
    provider: Arc<dyn Provider>,
    model: String,
}

impl EntityExtractor {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Extract entities from the query text.
    pub async fn extract(&self, text: &str) -> Result<Vec<String>, RetrievalError> {
        let request = CompletionRequest::text(
            &self.model,
            vec![Message::system(ENTITY_PROMPT), Message::user(text)],
        )
        .with_temperature(0.0);

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| RetrievalError::Entities(e.to_string()))?;

        let entities: Vec<String> = response
            .message
            .content
            .split(',')
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();

        debug!(count = entities.len(), "Extracted entities");
        Ok(entities)
    }
}
