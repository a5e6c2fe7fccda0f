//! Hybrid retriever — vector similarity plus keyword entity matching.
//!
//! Two passes against the index per query: one with full-text `should`
//! conditions built from extracted entities, one with metadata filters only.
//! The passes are merged, deduplicated by id keeping the best score, sorted
//! descending, and truncated to the caller's limit.

use crate::entities::EntityExtractor;
use async_trait::async_trait;
use podchat_core::document::{Document, DocumentSet};
use podchat_core::error::RetrievalError;
use podchat_core::provider::{EmbeddingRequest, Provider};
use podchat_core::retrieval::{FieldFilter, Retriever, SearchIndex, SearchRequest};
use std::sync::Arc;
use tracing::{debug, info};

/// Optional metadata filters applied to every search.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub subtopic: Option<String>,
    pub speakers: Option<Vec<String>>,
    pub title: Option<String>,
}

impl SearchFilters {
    fn to_must_conditions(&self) -> Vec<FieldFilter> {
        let mut must = Vec::new();
        if let Some(subtopic) = &self.subtopic {
            must.push(FieldFilter::Match {
                key: "subtopic".into(),
                value: subtopic.clone(),
            });
        }
        if let Some(speakers) = &self.speakers {
            must.push(FieldFilter::MatchAny {
                key: "metadata.speakers".into(),
                values: speakers.clone(),
            });
        }
        if let Some(title) = &self.title {
            must.push(FieldFilter::Match {
                key: "metadata.title".into(),
                value: title.clone(),
            });
        }
        must
    }
}

/// The hybrid retriever the RAG pipeline consumes.
pub struct HybridRetriever {
    index: Arc<dyn SearchIndex>,
    embedder: Arc<dyn Provider>,
    entities: EntityExtractor,
    embedding_model: String,
    score_threshold: f32,
    full_text_search: bool,
    filters: SearchFilters,
}

impl HybridRetriever {
    pub fn new(
        index: Arc<dyn SearchIndex>,
        embedder: Arc<dyn Provider>,
        entities: EntityExtractor,
        embedding_model: impl Into<String>,
    ) -> Self {
        Self {
            index,
            embedder,
            entities,
            embedding_model: embedding_model.into(),
            score_threshold: 0.0,
            full_text_search: true,
            filters: SearchFilters::default(),
        }
    }

    /// Set the minimum index score to accept.
    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold;
        self
    }

    /// Enable or disable the keyword-condition pass.
    pub fn with_full_text_search(mut self, enabled: bool) -> Self {
        self.full_text_search = enabled;
        self
    }

    /// Set metadata filters applied to every search.
    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, RetrievalError> {
        let response = self
            .embedder
            .embed(EmbeddingRequest {
                model: self.embedding_model.clone(),
                inputs: vec![query.to_string()],
            })
            .await
            .map_err(|e| RetrievalError::Embedding(e.to_string()))?;

        response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| RetrievalError::Embedding("no embedding returned".into()))
    }
}

#[async_trait]
impl Retriever for HybridRetriever {
    async fn retrieve(&self, query: &str, limit: usize) -> Result<DocumentSet, RetrievalError> {
        let vector = self.embed_query(query).await?;
        let must = self.filters.to_must_conditions();

        let mut hits: Vec<Document> = Vec::new();

        // Keyword-boosted pass
        if self.full_text_search {
            let entities = self.entities.extract(query).await?;
            let should: Vec<FieldFilter> = entities
                .into_iter()
                .map(|word| FieldFilter::Text {
                    key: "content".into(),
                    text: word,
                })
                .collect();

            let request = SearchRequest {
                vector: vector.clone(),
                limit,
                must: must.clone(),
                should,
                score_threshold: self.score_threshold,
            };
            hits.extend(self.index.search(request).await?);
        }

        // Plain vector pass
        let request = SearchRequest {
            vector,
            limit,
            must,
            should: Vec::new(),
            score_threshold: self.score_threshold,
        };
        hits.extend(self.index.search(request).await?);

        debug!(raw_hits = hits.len(), "Merging search passes");
        let set = DocumentSet::from_hits(hits, limit);
        info!(query_len = query.len(), documents = set.len(), "Retrieved documents");

        Ok(set)
    }
}
