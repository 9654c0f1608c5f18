//! HTTP handlers for the relay endpoints.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::error;

use crate::application::batching::BatchCoordinator;
use crate::application::handlers::relay::{
    GetHistoryError, GetHistoryHandler, GetHistoryQuery, ReceiveMessageCommand,
    ReceiveMessageError, ReceiveMessageHandler,
};
use crate::domain::messaging::Destination;
use crate::ports::{MessageStore, ReplyGenerator, UserRepository};

use super::dto::{
    ChatAcceptedResponse, ChatRequest, ErrorResponse, HealthResponse, HistoryParams,
    MessageResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the relay routes.
#[derive(Clone)]
pub struct RelayAppState {
    pub users: Arc<dyn UserRepository>,
    pub store: Arc<dyn MessageStore>,
    pub generator: Arc<dyn ReplyGenerator>,
    pub coordinator: BatchCoordinator,
    /// The relay's own number.
    pub relay: Destination,
}

impl RelayAppState {
    pub fn receive_message_handler(&self) -> ReceiveMessageHandler {
        ReceiveMessageHandler::new(
            self.users.clone(),
            self.store.clone(),
            self.generator.clone(),
            self.coordinator.clone(),
            self.relay.clone(),
        )
    }

    pub fn history_handler(&self) -> GetHistoryHandler {
        GetHistoryHandler::new(self.store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET / - liveness plus the number of batches waiting to flush
pub async fn health(State(state): State<RelayAppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "chat-relay".to_string(),
        pending_batches: state.coordinator.pending_batches(),
    })
}

/// POST /chat - queue an inbound message for batching
pub async fn receive_chat(
    State(state): State<RelayAppState>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, RelayApiError> {
    let cmd = ReceiveMessageCommand {
        sender: request.recipient,
        text: request.message,
    };

    let result = state.receive_message_handler().handle(cmd).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ChatAcceptedResponse {
            status: "queued".to_string(),
            user_id: result.user_id.to_string(),
            pending_messages: result.pending_messages,
        }),
    ))
}

/// GET /history/:recipient - messages to or from a number, newest first
pub async fn get_history(
    State(state): State<RelayAppState>,
    Path(recipient): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, RelayApiError> {
    let query = GetHistoryQuery {
        participant: recipient,
        limit: params.limit,
    };

    let messages = state.history_handler().handle(query).await?;

    let body: Vec<MessageResponse> = messages.into_iter().map(MessageResponse::from).collect();
    Ok(Json(body))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Converts handler errors to HTTP responses.
#[derive(Debug)]
pub enum RelayApiError {
    Receive(ReceiveMessageError),
    History(GetHistoryError),
}

impl From<ReceiveMessageError> for RelayApiError {
    fn from(err: ReceiveMessageError) -> Self {
        Self::Receive(err)
    }
}

impl From<GetHistoryError> for RelayApiError {
    fn from(err: GetHistoryError) -> Self {
        Self::History(err)
    }
}

impl IntoResponse for RelayApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self {
            RelayApiError::Receive(ReceiveMessageError::InvalidSender(e))
            | RelayApiError::History(GetHistoryError::InvalidParticipant(e)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", e.to_string())
            }
            RelayApiError::Receive(ReceiveMessageError::Conversation(e)) => {
                error!(error_kind = e.kind(), error = %e, "Could not start conversation");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_FAILED",
                    "Could not start a conversation for this user".to_string(),
                )
            }
            RelayApiError::History(GetHistoryError::NotFound(participant)) => (
                StatusCode::NOT_FOUND,
                "NO_MESSAGES",
                format!("No messages found for {}", participant),
            ),
            RelayApiError::Receive(ReceiveMessageError::Persistence(e))
            | RelayApiError::History(GetHistoryError::Persistence(e)) => {
                error!(error_kind = e.kind(), error = %e, "Persistence failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ValidationError;
    use crate::ports::{GenerationError, PersistenceError};

    fn status_of(err: RelayApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn errors_map_to_status_codes() {
        assert_eq!(
            status_of(ReceiveMessageError::InvalidSender(ValidationError::empty_field("sender")).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ReceiveMessageError::Conversation(GenerationError::EmptyReply).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(ReceiveMessageError::Persistence(PersistenceError::database("x")).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(GetHistoryError::NotFound("+1".to_string()).into()),
            StatusCode::NOT_FOUND
        );
    }
}
