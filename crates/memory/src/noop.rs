//! No-op session backend — disables session memory entirely.

use async_trait::async_trait;
use podchat_core::error::MemoryError;
use podchat_core::session::{SessionStore, SessionTurn};

/// A session store that records nothing.
pub struct NoopSession;

#[async_trait]
impl SessionStore for NoopSession {
    fn name(&self) -> &str {
        "none"
    }

    async fn record_turn(&self, _turn: SessionTurn) -> Result<String, MemoryError> {
        Ok(String::new())
    }

    async fn turns(&self) -> Result<Vec<SessionTurn>, MemoryError> {
        Ok(Vec::new())
    }

    async fn facts(&self) -> Result<Vec<String>, MemoryError> {
        Ok(Vec::new())
    }

    async fn clear(&self) -> Result<(), MemoryError> {
        Ok(())
    }
}
