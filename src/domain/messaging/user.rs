//! Relay user: one phone number, one ongoing conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::values::{ConversationContext, Destination};
use crate::domain::foundation::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub phone: Destination,
    pub conversation: ConversationContext,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Registers a new user for `phone` with a fresh conversation.
    pub fn register(phone: Destination, conversation: ConversationContext) -> Self {
        Self {
            id: UserId::new(),
            phone,
            conversation,
            created_at: Utc::now(),
        }
    }
}
