//! Relay HTTP adapter - inbound webhook, health, and history endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChatAcceptedResponse, ChatRequest, ErrorResponse, HealthResponse, HistoryParams,
    MessageResponse,
};
pub use handlers::{RelayApiError, RelayAppState};
pub use routes::{relay_router, relay_routes};
