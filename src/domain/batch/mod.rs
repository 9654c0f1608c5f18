//! Batch module - a burst of messages from one user awaiting a single reply.
//!
//! A `Batch` is an owned, detached value: the coordinator builds it up while
//! the debounce window is open and hands it to the flush pipeline once the
//! window closes. Nothing can append to a batch after it has been detached.

use crate::domain::foundation::UserId;
use crate::domain::messaging::{ConversationContext, Destination};

/// Separator used when joining batched messages into one prompt.
pub const MESSAGE_SEPARATOR: &str = "\n";

/// Messages accumulated for one user during a debounce window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    user_id: UserId,
    messages: Vec<String>,
    destination: Destination,
    conversation: ConversationContext,
}

impl Batch {
    /// Starts a batch with its first message.
    ///
    /// The destination and conversation captured here are used for the
    /// whole batch, whatever later messages declare.
    pub fn start(
        user_id: UserId,
        first_message: impl Into<String>,
        destination: Destination,
        conversation: ConversationContext,
    ) -> Self {
        Self {
            user_id,
            messages: vec![first_message.into()],
            destination,
            conversation,
        }
    }

    /// Appends a message, preserving arrival order.
    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Joins all messages in arrival order.
    pub fn combined_text(&self) -> String {
        self.messages.join(MESSAGE_SEPARATOR)
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn conversation(&self) -> &ConversationContext {
        &self.conversation
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
