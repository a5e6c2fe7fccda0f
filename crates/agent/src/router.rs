//! Route classification — should this turn hit the index at all?
//!
//! The upstream decision the pipeline consumes as input: one JSON-mode
//! completion over (query, recent messages, facts digest) producing the
//! direct answer (when history suffices), the `use_rag` flag, the user
//! intent, and the target emotion.

use crate::prompts;
use podchat_core::error::Error;
use podchat_core::message::{Message, Role};
use podchat_core::provider::{CompletionRequest, Provider};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// The routing decision for one user turn.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDecision {
    /// Direct answer derived from history ("no answer" when retrieval is
    /// needed).
    pub answer: String,

    /// Whether the RAG pipeline should run.
    pub use_rag: bool,

    /// Classified intent (e.g. "Information Request", "Toxic").
    pub user_intent: String,

    /// The emotion the reply should convey (e.g. "Empathy", "Neutral",
    /// "None").
    #[serde(default)]
    pub output_emotion: String,
}

/// Classifies each user turn before the pipeline runs.
pub struct RouteClassifier {
    provider: Arc<dyn Provider>,
    model: String,
}

impl RouteClassifier {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Classify the turn. `history` is the recent message window, `facts`
    /// the summarized digest of everything older.
    pub async fn classify(
        &self,
        query: &str,
        history: &[Message],
        facts: &str,
    ) -> Result<RouteDecision, Error> {
        let mut messages = vec![Message::system(prompts::ROUTE_CLASSIFIER)];
        messages.extend(
            history
                .iter()
                .filter(|m| m.role != Role::System)
                .cloned(),
        );
        messages.push(Message::user(format!(
            "Query: {query}\n\nSummarised History:\n{facts}"
        )));

        let request =
            CompletionRequest::json(&self.model, messages).with_temperature(0.0);

        let response = self.provider.complete(request).await?;
        let decision: RouteDecision = serde_json::from_str(&response.message.content)?;

        debug!(
            use_rag = decision.use_rag,
            intent = %decision.user_intent,
            "Classified route"
        );

        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[tokio::test]
    async fn parses_rag_decision() {
        let provider = Arc::new(SequentialMockProvider::from_texts(vec![
            r#"{"answer": "no answer", "use_rag": true, "user_intent": "Information Request", "output_emotion": "Neutral"}"#,
        ]));
        let classifier = RouteClassifier::new(provider, "router-model");
        let decision = classifier
            .classify("what about inflation?", &[], "No facts available")
            .await
            .unwrap();
        assert!(decision.use_rag);
        assert_eq!(decision.user_intent, "Information Request");
    }

    #[tokio::test]
    async fn parses_direct_answer_decision() {
        let provider = Arc::new(SequentialMockProvider::from_texts(vec![
            r#"{"answer": "Alice covered that [(00:12:03)](https://y.t/abc)", "use_rag": false, "user_intent": "Information Request", "output_emotion": "Neutral"}"#,
        ]));
        let classifier = RouteClassifier::new(provider, "router-model");
        let decision = classifier
            .classify("again, who covered rates?", &[], "Alice covered rates")
            .await
            .unwrap();
        assert!(!decision.use_rag);
        assert!(decision.answer.contains("00:12:03"));
    }

    #[tokio::test]
    async fn malformed_decision_is_an_error() {
        let provider = Arc::new(SequentialMockProvider::from_texts(vec![
            "sure, let me look that up",
        ]));
        let classifier = RouteClassifier::new(provider, "router-model");
        let result = classifier.classify("query", &[], "").await;
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[tokio::test]
    async fn history_window_is_forwarded() {
        let provider = Arc::new(SequentialMockProvider::from_texts(vec![
            r#"{"answer": "no answer", "use_rag": true, "user_intent": "Information Request", "output_emotion": "Neutral"}"#,
        ]));
        let classifier = RouteClassifier::new(provider.clone(), "router-model");
        let history = vec![
            Message::user("who hosts the show?"),
            Message::assistant("Alice does"),
        ];
        classifier.classify("and the co-host?", &history, "").await.unwrap();

        let requests = provider.requests();
        // system + 2 history + final user message
        assert_eq!(requests[0].messages.len(), 4);
        assert_eq!(requests[0].messages[1].content, "who hosts the show?");
        assert!(requests[0].messages[3].content.contains("and the co-host?"));
    }
}
