//! Chat messages as they are recorded by the relay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::values::{Destination, MessageDirection};
use crate::domain::foundation::{MessageId, UserId};

/// A message that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    /// Address the message was sent to.
    pub recipient: Destination,
    /// Address the message came from.
    pub sender: Destination,
    /// Message body.
    pub text: String,
    /// Incoming (from the user) or outgoing (from the relay).
    pub direction: MessageDirection,
    /// Owning user, when known.
    pub user_id: Option<UserId>,
}

impl NewMessage {
    /// A message the user sent to the relay.
    pub fn incoming(
        user_id: UserId,
        from: Destination,
        relay: Destination,
        text: impl Into<String>,
    ) -> Self {
        Self {
            recipient: relay,
            sender: from,
            text: text.into(),
            direction: MessageDirection::Incoming,
            user_id: Some(user_id),
        }
    }

    /// A reply the relay sent to the user.
    pub fn outgoing(
        user_id: UserId,
        to: Destination,
        relay: Destination,
        text: impl Into<String>,
    ) -> Self {
        Self {
            recipient: to,
            sender: relay,
            text: text.into(),
            direction: MessageDirection::Outgoing,
            user_id: Some(user_id),
        }
    }

    /// Stamps the message with an id and creation time.
    pub fn into_stored(self, id: MessageId, created_at: DateTime<Utc>) -> StoredMessage {
        StoredMessage {
            id,
            recipient: self.recipient,
            sender: self.sender,
            text: self.text,
            direction: self.direction,
            user_id: self.user_id,
            created_at,
        }
    }
}

/// A persisted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: MessageId,
    pub recipient: Destination,
    pub sender: Destination,
    pub text: String,
    pub direction: MessageDirection,
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl StoredMessage {
    /// Returns true if `participant` sent or received this message.
    pub fn involves(&self, participant: &Destination) -> bool {
        &self.sender == participant || &self.recipient == participant
    }
}
