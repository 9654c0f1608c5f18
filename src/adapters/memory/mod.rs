//! In-memory persistence adapters.
//!
//! Used in tests and when no database is configured.

mod message_store;
mod user_repository;

pub use message_store::InMemoryMessageStore;
pub use user_repository::InMemoryUserRepository;
