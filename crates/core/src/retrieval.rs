//! Retrieval traits — the seams between the pipeline and the vector index.
//!
//! `SearchIndex` is the raw vector-search backend (one HTTP search call).
//! `Retriever` is what the pipeline consumes: a query string in, an ordered
//! `DocumentSet` out. The hybrid retriever in `podchat-retrieval` implements
//! `Retriever` on top of a `SearchIndex` plus embedding and entity-extraction
//! calls.

use crate::document::{Document, DocumentSet};
use crate::error::RetrievalError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A filter condition on a payload field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldFilter {
    /// Exact match on a single value.
    Match { key: String, value: String },
    /// Match any of the given values.
    MatchAny { key: String, values: Vec<String> },
    /// Full-text match within a text field.
    Text { key: String, text: String },
}

/// One vector search against the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The query embedding.
    pub vector: Vec<f32>,

    /// Maximum number of hits to return.
    pub limit: usize,

    /// Conditions every hit must satisfy.
    #[serde(default)]
    pub must: Vec<FieldFilter>,

    /// Conditions that boost hits without excluding others.
    #[serde(default)]
    pub should: Vec<FieldFilter>,

    /// Minimum score for a hit to be returned.
    #[serde(default)]
    pub score_threshold: f32,
}

impl SearchRequest {
    pub fn new(vector: Vec<f32>, limit: usize) -> Self {
        Self {
            vector,
            limit,
            must: Vec::new(),
            should: Vec::new(),
            score_threshold: 0.0,
        }
    }
}

/// The raw vector-search backend.
///
/// One call, one ranked hit list. No retry: a transport failure surfaces to
/// the caller, and the control loop decides whether to requery.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// The index name (e.g., "qdrant").
    fn name(&self) -> &str;

    /// Run one search and return the raw hits, highest score first.
    async fn search(
        &self,
        request: SearchRequest,
    ) -> std::result::Result<Vec<Document>, RetrievalError>;
}

/// What the RAG pipeline consumes: query in, evidence out.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Retrieve an ordered, deduplicated document set for the query,
    /// truncated to `limit`.
    async fn retrieve(
        &self,
        query: &str,
        limit: usize,
    ) -> std::result::Result<DocumentSet, RetrievalError>;
}
