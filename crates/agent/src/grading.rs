//! The three binary graders: document relevance, groundedness, answer
//! relevance.
//!
//! Each grade is one JSON-mode completion parsed into `GradeResponse` at the
//! boundary. Anything that fails to parse, or parses to something other than
//! "yes", is a `No` — the retry loops must be driven by the budgets alone,
//! never by a malformed-but-repeatedly-non-"no" signal.

use crate::prompts;
use podchat_core::document::{Document, DocumentSet};
use podchat_core::error::ProviderError;
use podchat_core::message::Message;
use podchat_core::provider::{CompletionRequest, Provider};
use podchat_core::verdict::Verdict;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// The structured output every grader must produce.
#[derive(Debug, Deserialize)]
struct GradeResponse {
    binary_score: String,
}

/// Runs the three binary classifiers on the grading model.
///
/// Stateless: each call is a pure function of its inputs as far as the
/// pipeline is concerned.
pub struct Grader {
    provider: Arc<dyn Provider>,
    model: String,
}

impl Grader {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Is this single document pertinent to the query? Lenient.
    pub async fn grade_document(
        &self,
        query: &str,
        document: &Document,
    ) -> Result<Verdict, ProviderError> {
        let user = format!("Query: {}\n\nDocument: {}", query, document.to_markdown());
        let verdict = self.classify(prompts::DOCUMENT_GRADER, user).await?;
        debug!(document = %document.id, %verdict, "Graded document");
        Ok(verdict)
    }

    /// Is every claim in the answer supported by the evidence? Strict.
    pub async fn grade_groundedness(
        &self,
        evidence: &DocumentSet,
        answer: &str,
    ) -> Result<Verdict, ProviderError> {
        let user = format!(
            "Set of facts:\n\n{}\n\nLLM generation: {}",
            evidence.render_evidence(),
            answer
        );
        let verdict = self.classify(prompts::GROUNDEDNESS_GRADER, user).await?;
        debug!(documents = evidence.len(), %verdict, "Graded groundedness");
        Ok(verdict)
    }

    /// Does the answer address the question? Lenient.
    pub async fn grade_answer(
        &self,
        answer: &str,
        question: &str,
    ) -> Result<Verdict, ProviderError> {
        let user = format!("Question: {}\n\nAnswer: {}", question, answer);
        let verdict = self.classify(prompts::ANSWER_GRADER, user).await?;
        debug!(%verdict, "Graded answer relevance");
        Ok(verdict)
    }

    async fn classify(&self, system: &str, user: String) -> Result<Verdict, ProviderError> {
        let request = CompletionRequest::json(
            &self.model,
            vec![Message::system(system), Message::user(user)],
        )
        .with_temperature(0.0)
        .with_max_tokens(16);

        let response = self.provider.complete(request).await?;
        let content = response.message.content;

        // Fail closed: unparseable output grades as "no".
        let verdict = match serde_json::from_str::<GradeResponse>(&content) {
            Ok(grade) => Verdict::from_raw(&grade.binary_score),
            Err(e) => {
                warn!(error = %e, raw = %content, "Unparseable grader output, treating as no");
                Verdict::No
            }
        };

        Ok(verdict)
    }
}
