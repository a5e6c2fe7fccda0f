//! Session memory — conversation turns and summarized facts.
//!
//! The chat surface records each user/assistant turn pair and keeps a short
//! "facts" digest per turn. Facts feed the route classifier and the answer
//! generator as conversation context. Durability is a non-goal: backends are
//! in-process.

use crate::error::MemoryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed user/assistant exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTurn {
    /// Unique ID for this turn
    pub id: String,

    /// What the user asked
    pub user: String,

    /// What the assistant replied
    pub assistant: String,

    /// A one-line digest of the reply (speaker, timestamp, url retained),
    /// produced by the summarizer. Absent if summarization was skipped or
    /// failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// When this turn completed
    pub created_at: DateTime<Utc>,
}

impl SessionTurn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user: user.into(),
            assistant: assistant.into(),
            summary: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_summary(mut self, summary: Option<String>) -> Self {
        self.summary = summary;
        self
    }
}

/// The session store trait.
///
/// Implementations: in-memory (default), no-op (memory disabled).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The backend name (e.g., "in_memory", "none").
    fn name(&self) -> &str;

    /// Record a completed turn. Returns the turn id.
    async fn record_turn(&self, turn: SessionTurn) -> std::result::Result<String, MemoryError>;

    /// All recorded turns, oldest first.
    async fn turns(&self) -> std::result::Result<Vec<SessionTurn>, MemoryError>;

    /// The accumulated facts digest, oldest first (one line per summarized
    /// turn).
    async fn facts(&self) -> std::result::Result<Vec<String>, MemoryError>;

    /// Drop all recorded turns.
    async fn clear(&self) -> std::result::Result<(), MemoryError>;
}
