//! In-memory message store for tests and database-less runs.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::foundation::MessageId;
use crate::domain::messaging::{Destination, NewMessage, StoredMessage};
use crate::ports::{MessageStore, PersistenceError};

/// Keeps every message in insertion order. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageStore {
    messages: Arc<RwLock<Vec<StoredMessage>>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored messages, oldest first.
    pub async fn all(&self) -> Vec<StoredMessage> {
        self.messages.read().await.clone()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn record(&self, message: NewMessage) -> Result<StoredMessage, PersistenceError> {
        let stored = message.into_stored(MessageId::new(), Utc::now());
        self.messages.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn history(
        &self,
        participant: &Destination,
        limit: u32,
    ) -> Result<Vec<StoredMessage>, PersistenceError> {
        let messages = self.messages.read().await;
        Ok(messages
            .iter()
            .rev()
            .filter(|m| m.involves(participant))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
