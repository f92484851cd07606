//! Chat history handler.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::domain::RoomId;
use crate::error::{ErrorResponse, GatewayError};
use crate::persistence::models::StoredMessage;

/// `GET /api/messages/{room_id}`: Chat history of a room, oldest first.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] if the store fails.
#[utoipa::path(
    get,
    path = "/api/messages/{room_id}",
    tag = "Messages",
    summary = "Room chat history",
    description = "Returns logged chat messages of the room in send order, capped by the configured history limit.",
    params(("room_id" = RoomId, Path, description = "Room identifier")),
    responses(
        (status = 200, description = "Messages, oldest first", body = Vec<StoredMessage>),
        (status = 400, description = "Malformed room id", body = ErrorResponse),
    )
)]
pub async fn list_room_messages(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
) -> Result<impl IntoResponse, GatewayError> {
    let messages = state
        .store
        .list_messages(room_id, state.message_history_limit)
        .await?;
    Ok(Json(messages))
}

/// History routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/messages/{room_id}", get(list_room_messages))
}
