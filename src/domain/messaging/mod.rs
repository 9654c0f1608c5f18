//! Messaging module - users, addresses and recorded messages.

mod message;
mod user;
mod values;

pub use message::{NewMessage, StoredMessage};
pub use user::User;
pub use values::{ConversationContext, Destination, MessageDirection};
