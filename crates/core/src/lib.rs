//! # podchat Core
//!
//! Domain types, traits, and error definitions for the podchat RAG agent.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (LLM provider, vector index, session store) is
//! defined as a trait here. Implementations live in their respective crates.
//! This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod document;
pub mod error;
pub mod message;
pub mod provider;
pub mod retrieval;
pub mod session;
pub mod verdict;

// Re-export key types at crate root for ergonomics
pub use document::{Document, DocumentSet};
pub use error::{Error, MemoryError, ProviderError, Result, RetrievalError};
pub use message::{Conversation, Message, Role, SessionId};
pub use provider::{
    CompletionRequest, CompletionResponse, EmbeddingRequest, EmbeddingResponse, Provider,
    ResponseFormat, Usage,
};
pub use retrieval::{FieldFilter, Retriever, SearchIndex, SearchRequest};
pub use session::{SessionStore, SessionTurn};
pub use verdict::Verdict;
