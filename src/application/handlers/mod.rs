//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod relay;

pub use relay::{
    GetHistoryError, GetHistoryHandler, GetHistoryQuery, ReceiveMessageCommand,
    ReceiveMessageError, ReceiveMessageHandler, ReceiveMessageResult,
};
