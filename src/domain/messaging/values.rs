//! Value objects for addressing and conversation state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Channel prefix Twilio puts in front of WhatsApp addresses.
const WHATSAPP_PREFIX: &str = "whatsapp:";

/// A delivery address (phone number) for a chat participant.
///
/// Parsing trims surrounding whitespace and strips a leading `whatsapp:`
/// channel prefix so the same participant always maps to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Destination(String);

impl Destination {
    /// Parses a raw address into a `Destination`.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = raw.as_ref().trim();
        let address = trimmed
            .strip_prefix(WHATSAPP_PREFIX)
            .unwrap_or(trimmed)
            .trim();

        if address.is_empty() {
            return Err(ValidationError::empty_field("destination"));
        }
        if address.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format(
                "destination",
                "address cannot contain whitespace",
            ));
        }

        Ok(Self(address.to_string()))
    }

    /// Returns the bare address.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the address with a channel prefix (e.g. `whatsapp:+15551234567`).
    pub fn with_channel(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.0)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Destination {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Destination> for String {
    fn from(value: Destination) -> Self {
        value.0
    }
}

/// Opaque continuation token that lets the reply generator keep dialogue state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationContext(String);

impl ConversationContext {
    /// Creates a new context token, returning error if empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ValidationError::empty_field("conversation"));
        }
        Ok(Self(token))
    }

    /// Returns the inner token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a message was received from or sent to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageDirection {
    Incoming,
    Outgoing,
}

impl MessageDirection {
    /// Returns the storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageDirection::Incoming => "incoming",
            MessageDirection::Outgoing => "outgoing",
        }
    }
}

impl fmt::Display for MessageDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incoming" => Ok(MessageDirection::Incoming),
            "outgoing" => Ok(MessageDirection::Outgoing),
            other => Err(ValidationError::invalid_format(
                "direction",
                format!("unknown direction '{}'", other),
            )),
        }
    }
}
