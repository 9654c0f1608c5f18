//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the relay core and the outside world. Adapters implement these ports.
//!
//! ## Flush Collaborators
//!
//! - `ReplyGenerator` - text-generation service (combined text in, reply out)
//! - `DeliverySender` - outbound messaging service
//! - `MessageStore` - persistence sink for incoming and outgoing messages
//!
//! ## Inbound Collaborators
//!
//! - `UserRepository` - phone number to user resolution

mod delivery_sender;
mod message_store;
mod reply_generator;
mod user_repository;

pub use delivery_sender::{DeliveryError, DeliveryReceipt, DeliverySender};
pub use message_store::{MessageStore, PersistenceError};
pub use reply_generator::{GenerationError, ReplyGenerator};
pub use user_repository::UserRepository;
