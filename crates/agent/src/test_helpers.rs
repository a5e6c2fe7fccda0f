//! Shared test helpers for the pipeline tests.

use async_trait::async_trait;
use podchat_core::document::{Document, DocumentSet};
use podchat_core::error::{ProviderError, RetrievalError};
use podchat_core::message::Message;
use podchat_core::provider::{CompletionRequest, CompletionResponse, Provider, Usage};
use podchat_core::retrieval::Retriever;
use std::sync::Mutex;

/// A mock provider that returns a sequence of scripted response texts.
///
/// Each call to `complete` returns the next text in the queue and records the
/// request for inspection. Panics if more calls are made than responses
/// provided, unless built with `repeating`.
pub struct SequentialMockProvider {
    responses: Vec<String>,
    repeat_last: bool,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl SequentialMockProvider {
    pub fn from_texts(texts: Vec<&str>) -> Self {
        Self {
            responses: texts.into_iter().map(String::from).collect(),
            repeat_last: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider that returns the same text on every call.
    pub fn repeating(text: &str) -> Self {
        Self {
            responses: vec![text.to_string()],
            repeat_last: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request);
        let index = requests.len() - 1;

        let text = if index < self.responses.len() {
            self.responses[index].clone()
        } else if self.repeat_last && !self.responses.is_empty() {
            self.responses.last().unwrap().clone()
        } else {
            panic!(
                "SequentialMockProvider: no more responses (call #{}, have {})",
                index + 1,
                self.responses.len()
            );
        };

        Ok(CompletionResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".into(),
        })
    }
}

/// A retriever that serves the same hit list on every call and records the
/// queries it saw.
pub struct FixedRetriever {
    hits: Vec<Document>,
    queries: Mutex<Vec<String>>,
}

impl FixedRetriever {
    pub fn new(hits: Vec<Document>) -> Self {
        Self {
            hits,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Retriever for FixedRetriever {
    async fn retrieve(&self, query: &str, limit: usize) -> Result<DocumentSet, RetrievalError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(DocumentSet::from_hits(self.hits.clone(), limit))
    }
}

/// A retriever whose backend is always down.
pub struct FailingRetriever;

#[async_trait]
impl Retriever for FailingRetriever {
    async fn retrieve(&self, _query: &str, _limit: usize) -> Result<DocumentSet, RetrievalError> {
        Err(RetrievalError::Search("connection refused".into()))
    }
}

/// Build a test document.
pub fn make_doc(id: &str, content: &str, score: f32) -> Document {
    Document {
        id: id.into(),
        title: "Episode 42".into(),
        subtopic: "markets".into(),
        speakers: vec!["Alice".into()],
        timestamp: "00:12:03".into(),
        url: "https://youtube.com/watch?v=abc&t=723".into(),
        content: content.into(),
        score,
    }
}
