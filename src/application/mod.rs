//! Application layer - batching engine plus command and query handlers.
//!
//! Handlers orchestrate the ports; the batching module owns the per-user
//! debounce state that sits between inbound messages and replies.

pub mod batching;
pub mod handlers;

pub use batching::{BatchCoordinator, CoordinatorConfig, FlushPipeline};
pub use handlers::{
    GetHistoryError, GetHistoryHandler, GetHistoryQuery, ReceiveMessageCommand,
    ReceiveMessageError, ReceiveMessageHandler, ReceiveMessageResult,
};
