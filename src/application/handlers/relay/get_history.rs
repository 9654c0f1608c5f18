//! GetHistoryHandler - query handler for a participant's message log.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::ValidationError;
use crate::domain::messaging::{Destination, StoredMessage};
use crate::ports::{MessageStore, PersistenceError};

pub const DEFAULT_HISTORY_LIMIT: u32 = 50;
pub const MAX_HISTORY_LIMIT: u32 = 500;

/// Query for messages sent to or from one address.
#[derive(Debug, Clone)]
pub struct GetHistoryQuery {
    pub participant: String,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetHistoryError {
    #[error("invalid participant: {0}")]
    InvalidParticipant(#[from] ValidationError),

    #[error("no messages found for {0}")]
    NotFound(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub struct GetHistoryHandler {
    store: Arc<dyn MessageStore>,
}

impl GetHistoryHandler {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Returns the newest messages first.
    pub async fn handle(&self, query: GetHistoryQuery) -> Result<Vec<StoredMessage>, GetHistoryError> {
        let participant = Destination::parse(&query.participant)?;
        let limit = query
            .limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);

        let messages = self.store.history(&participant, limit).await?;
        if messages.is_empty() {
            return Err(GetHistoryError::NotFound(participant.to_string()));
        }
        Ok(messages)
    }
}
