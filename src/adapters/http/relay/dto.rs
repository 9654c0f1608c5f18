//! Request and response bodies for the relay endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::messaging::StoredMessage;

/// `POST /chat` body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// The user's phone number (`whatsapp:` prefix optional).
    pub recipient: String,
    pub message: String,
}

/// `POST /chat` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatAcceptedResponse {
    pub status: String,
    pub user_id: String,
    pub pending_messages: usize,
}

/// `GET /` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub pending_batches: usize,
}

/// `GET /history/:recipient` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

/// One entry of the history listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub id: String,
    pub recipient: String,
    pub sender: String,
    pub message_text: String,
    /// RFC 3339
    pub timestamp: String,
    pub direction: String,
}

impl From<StoredMessage> for MessageResponse {
    fn from(message: StoredMessage) -> Self {
        Self {
            id: message.id.to_string(),
            recipient: message.recipient.to_string(),
            sender: message.sender.to_string(),
            message_text: message.text,
            timestamp: message.created_at.to_rfc3339(),
            direction: message.direction.to_string(),
        }
    }
}

/// Error body for every relay endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
