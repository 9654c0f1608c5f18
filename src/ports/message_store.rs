//! Message Store Port - persistence sink for incoming and outgoing messages.
//!
//! Writes happen on the inbound path (incoming messages) and at the end of a
//! successful flush (the outgoing reply). Reads serve the history endpoint.

use async_trait::async_trait;

use crate::domain::messaging::{Destination, NewMessage, StoredMessage};

/// Port for recording and reading chat messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persists a message and returns the stored record.
    async fn record(&self, message: NewMessage) -> Result<StoredMessage, PersistenceError>;

    /// Returns up to `limit` messages sent to or from `participant`, newest first.
    async fn history(
        &self,
        participant: &Destination,
        limit: u32,
    ) -> Result<Vec<StoredMessage>, PersistenceError>;
}

/// Storage errors shared by the persistence ports.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// The backing store failed.
    #[error("database error: {0}")]
    Database(String),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored row could not be mapped back into the domain.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl PersistenceError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt(message.into())
    }

    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PersistenceError::Database(_) => "database",
            PersistenceError::Conflict(_) => "conflict",
            PersistenceError::Corrupt(_) => "corrupt",
        }
    }
}
