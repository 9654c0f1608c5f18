//! Reply Generator Port - Interface for the text-generation service.
//!
//! The batch coordinator hands the combined text of a batch to a
//! `ReplyGenerator` together with the user's conversation context and gets
//! back the reply to deliver.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoGenerator;
//!
//! #[async_trait]
//! impl ReplyGenerator for EchoGenerator {
//!     async fn generate(
//!         &self,
//!         prompt: &str,
//!         _conversation: &ConversationContext,
//!     ) -> Result<String, GenerationError> {
//!         Ok(prompt.to_string())
//!     }
//!     // ... start_conversation
//! }
//! ```

use async_trait::async_trait;

use crate::domain::messaging::ConversationContext;

/// Port for text-generation interactions.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Generates a reply to `prompt` within the given conversation.
    async fn generate(
        &self,
        prompt: &str,
        conversation: &ConversationContext,
    ) -> Result<String, GenerationError>;

    /// Opens a new conversation and returns its continuation token.
    ///
    /// Called once per user, on first contact.
    async fn start_conversation(&self) -> Result<ConversationContext, GenerationError>;
}

/// Text-generation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Provider rejected the request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Provider answered but produced no text.
    #[error("provider returned an empty reply")]
    EmptyReply,

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },
}

impl GenerationError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::RateLimited { .. } => "rate_limited",
            GenerationError::Unavailable { .. } => "unavailable",
            GenerationError::AuthenticationFailed => "authentication_failed",
            GenerationError::Network(_) => "network",
            GenerationError::Parse(_) => "parse",
            GenerationError::InvalidRequest(_) => "invalid_request",
            GenerationError::EmptyReply => "empty_reply",
            GenerationError::Timeout { .. } => "timeout",
        }
    }
}
