//! Delivery Sender Port - Interface for the outbound messaging service.

use async_trait::async_trait;

use crate::domain::messaging::Destination;

/// Port for delivering a reply to a chat participant.
#[async_trait]
pub trait DeliverySender: Send + Sync {
    /// Sends `body` to `destination`.
    async fn send(
        &self,
        destination: &Destination,
        body: &str,
    ) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Acknowledgement returned by the messaging provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Provider-side message id (Twilio `SM...` sid), when reported.
    pub provider_message_id: Option<String>,
}

impl DeliveryReceipt {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            provider_message_id: Some(id.into()),
        }
    }
}

/// Outbound delivery errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// Provider refused the message (bad number, unapproved template, ...).
    #[error("message rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Rate limited by provider.
    #[error("rate limited by messaging provider")]
    RateLimited,

    /// Provider is unavailable.
    #[error("messaging provider unavailable: {0}")]
    Unavailable(String),

    /// Credentials were refused.
    #[error("messaging authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("delivery timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl DeliveryError {
    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DeliveryError::Rejected { .. } => "rejected",
            DeliveryError::RateLimited => "rate_limited",
            DeliveryError::Unavailable(_) => "unavailable",
            DeliveryError::AuthenticationFailed => "authentication_failed",
            DeliveryError::Network(_) => "network",
            DeliveryError::Timeout { .. } => "timeout",
        }
    }
}
