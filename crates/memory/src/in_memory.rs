//! In-memory session backend — the default for chat sessions.

use async_trait::async_trait;
use podchat_core::error::MemoryError;
use podchat_core::session::{SessionStore, SessionTurn};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A session store backed by a Vec. Turns live as long as the process.
pub struct InMemorySession {
    turns: Arc<RwLock<Vec<SessionTurn>>>,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self {
            turns: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemorySession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySession {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn record_turn(&self, mut turn: SessionTurn) -> Result<String, MemoryError> {
        if turn.id.is_empty() {
            turn.id = Uuid::new_v4().to_string();
        }
        let id = turn.id.clone();
        self.turns.write().await.push(turn);
        Ok(id)
    }

    async fn turns(&self) -> Result<Vec<SessionTurn>, MemoryError> {
        Ok(self.turns.read().await.clone())
    }

    async fn facts(&self) -> Result<Vec<String>, MemoryError> {
        Ok(self
            .turns
            .read()
            .await
            .iter()
            .filter_map(|t| t.summary.clone())
            .collect())
    }

    async fn clear(&self) -> Result<(), MemoryError> {
        self.turns.write().await.clear();
        Ok(())
    }
}
