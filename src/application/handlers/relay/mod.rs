//! Relay handlers - inbound messages and history queries.

mod get_history;
mod receive_message;

pub use get_history::{
    GetHistoryError, GetHistoryHandler, GetHistoryQuery, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT,
};
pub use receive_message::{
    ReceiveMessageCommand, ReceiveMessageError, ReceiveMessageHandler, ReceiveMessageResult,
};
