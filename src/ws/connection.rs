//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection. The
//! socket is split: a writer task owns the sink and drains the client's
//! outbound channel, while the read loop parses inbound events and
//! dispatches them. When either half stops, the session is cleaned up
//! before this function returns.

use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::messages::{ClientMessage, ServerMessage};
use crate::app_state::AppState;
use crate::domain::ClientId;
use crate::error::GatewayError;
use crate::service::Signal;

/// How long a closing connection waits for queued messages to flush.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Registers the client with the engine (rejecting duplicate ids).
/// - Reads events from the client and dispatches them.
/// - On close, error, or writer failure, runs the disconnect cleanup.
pub async fn run_connection(socket: WebSocket, client_id: ClientId, state: AppState) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<ServerMessage>();

    if let Err(e) = state.engine.connect(client_id.clone(), tx.clone()).await {
        tracing::warn!(%client_id, error = %e, "connection rejected");
        let _ = ws_tx
            .send(Message::Close(Some(CloseFrame {
                code: close_code::POLICY,
                reason: e.to_string().into(),
            })))
            .await;
        return;
    }

    let mut writer = tokio::spawn(write_loop(ws_tx, rx, client_id.clone()));

    let writer_finished = loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_text_message(text.as_str(), &client_id, &state).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break false,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        let err = GatewayError::Transport(e.to_string());
                        tracing::debug!(%client_id, error = %err, "socket read failed");
                        break false;
                    }
                }
            }
            _ = &mut writer => break true,
        }
    };

    if let Some(outcome) = state.engine.disconnect_if_bound(&client_id, &tx).await {
        tracing::debug!(%client_id, ?outcome, "session cleaned up");
    }
    drop(tx);

    if !writer_finished && tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut writer).await.is_err() {
        writer.abort();
    }

    tracing::debug!(%client_id, "ws connection closed");
}

/// Serializes queued messages onto the socket until the channel closes or
/// a write fails. Dropping the receiver marks the transport as broken for
/// the engine.
async fn write_loop(
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    client_id: ClientId,
) {
    while let Some(msg) = rx.recv().await {
        let json = match serde_json::to_string(&msg) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(%client_id, kind = msg.kind(), error = %e, "failed to encode message");
                continue;
            }
        };
        if let Err(e) = ws_tx.send(Message::text(json)).await {
            tracing::debug!(%client_id, error = %e, "socket write failed");
            return;
        }
    }
    let _ = ws_tx.send(Message::Close(None)).await;
}

/// Parses one text frame and routes it. Malformed events are logged and
/// discarded; the connection stays usable.
async fn handle_text_message(text: &str, client_id: &ClientId, state: &AppState) {
    let msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            let err = GatewayError::Protocol(e.to_string());
            tracing::warn!(%client_id, error = %err, "discarding event");
            return;
        }
    };
    tracing::debug!(%client_id, kind = msg.kind(), "received event");

    match msg {
        ClientMessage::Ready { interests } => {
            if let Err(e) = state.engine.ready(client_id, interests).await {
                tracing::warn!(%client_id, error = %e, "ready rejected");
            }
        }
        ClientMessage::Offer { sdp } => {
            state.relay.forward_signal(client_id, Signal::Offer(sdp)).await;
        }
        ClientMessage::Answer { sdp } => {
            state.relay.forward_signal(client_id, Signal::Answer(sdp)).await;
        }
        ClientMessage::IceCandidate { candidate } => {
            state
                .relay
                .forward_signal(client_id, Signal::IceCandidate(candidate))
                .await;
        }
        ClientMessage::ChatMessage { message } => {
            state.relay.forward_chat(client_id, message).await;
        }
        ClientMessage::Disconnect => {
            let outcome = state.engine.leave(client_id).await;
            tracing::debug!(%client_id, ?outcome, "explicit leave");
        }
    }
}
