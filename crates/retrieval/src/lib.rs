//! Retrieval for podchat — hybrid vector + keyword search over the
//! transcript index.
//!
//! The `HybridRetriever` embeds the query, extracts entities for full-text
//! conditions, runs the index search with and without those conditions, and
//! merges the passes into one deduplicated, score-ordered `DocumentSet`.

pub mod entities;
pub mod hybrid;
pub mod qdrant;

pub use entities::EntityExtractor;
pub use hybrid::{HybridRetriever, SearchFilters};
pub use qdrant::QdrantIndex;
