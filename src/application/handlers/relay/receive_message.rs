//! ReceiveMessageHandler - command handler for inbound chat messages.
//!
//! Resolves (or registers) the sending user, records the message, and hands
//! it to the batch coordinator. Returns as soon as the message is queued; the
//! reply is produced later by the coordinator's flush.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::batching::BatchCoordinator;
use crate::domain::foundation::{UserId, ValidationError};
use crate::domain::messaging::{Destination, NewMessage, User};
use crate::ports::{GenerationError, MessageStore, PersistenceError, ReplyGenerator, UserRepository};

/// Command carrying one inbound message.
#[derive(Debug, Clone)]
pub struct ReceiveMessageCommand {
    /// Raw sender address, with or without channel prefix.
    pub sender: String,
    pub text: String,
}

/// Result of queueing an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveMessageResult {
    pub user_id: UserId,
    /// Messages now waiting in the user's batch (0 when debounce is disabled).
    pub pending_messages: usize,
    /// True when this message registered the user.
    pub new_user: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiveMessageError {
    #[error("invalid sender: {0}")]
    InvalidSender(#[from] ValidationError),

    #[error("could not start conversation: {0}")]
    Conversation(#[from] GenerationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Handler for inbound messages.
pub struct ReceiveMessageHandler {
    users: Arc<dyn UserRepository>,
    store: Arc<dyn MessageStore>,
    generator: Arc<dyn ReplyGenerator>,
    coordinator: BatchCoordinator,
    relay: Destination,
}

impl ReceiveMessageHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        store: Arc<dyn MessageStore>,
        generator: Arc<dyn ReplyGenerator>,
        coordinator: BatchCoordinator,
        relay: Destination,
    ) -> Self {
        Self {
            users,
            store,
            generator,
            coordinator,
            relay,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReceiveMessageCommand,
    ) -> Result<ReceiveMessageResult, ReceiveMessageError> {
        let phone = Destination::parse(&cmd.sender)?;

        let (user, new_user) = self.resolve_user(phone).await?;

        self.store
            .record(NewMessage::incoming(
                user.id,
                user.phone.clone(),
                self.relay.clone(),
                cmd.text.clone(),
            ))
            .await?;

        info!(
            user_id = %user.id,
            sender = %user.phone,
            recipient = %self.relay,
            text_len = cmd.text.len(),
            "INCOMING message queued"
        );

        self.coordinator
            .add_message(user.id, cmd.text, user.phone, user.conversation);

        Ok(ReceiveMessageResult {
            user_id: user.id,
            pending_messages: self.coordinator.pending_messages(&user.id).unwrap_or(0),
            new_user,
        })
    }

    /// Finds the user for `phone` or registers one with a new conversation.
    ///
    /// Two first messages racing for the same phone both start a conversation;
    /// `create` keeps the first registration, so both resolve to one user and
    /// the losing request's conversation is never used.
    async fn resolve_user(&self, phone: Destination) -> Result<(User, bool), ReceiveMessageError> {
        if let Some(user) = self.users.find_by_phone(&phone).await? {
            return Ok((user, false));
        }

        let conversation = self.generator.start_conversation().await?;
        let user = self.users.create(User::register(phone, conversation)).await?;
        info!(user_id = %user.id, phone = %user.phone, "Registered new user");
        Ok((user, true))
    }
}
