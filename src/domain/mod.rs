//! Domain layer - the vocabulary of the relay.
//!
//! - `foundation` - identifiers and validation errors
//! - `messaging` - users, addresses, recorded messages
//! - `batch` - the per-user burst of messages awaiting one reply

pub mod batch;
pub mod foundation;
pub mod messaging;
