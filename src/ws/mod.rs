//! WebSocket layer: per-client connection loop and wire protocol.
//!
//! Each client connects at `/ws/{client_id}`. Inbound JSON events are
//! dispatched to the [`crate::service::MatchEngine`] or the
//! [`crate::service::SignalingRelay`]; outbound messages flow through the
//! client's registered channel into a dedicated writer task.

pub mod connection;
pub mod handler;
pub mod messages;
