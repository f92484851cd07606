//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::persistence::Store;
use crate::service::{MatchEngine, SignalingRelay};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pairing engine; single writer for sessions, pool, and rooms.
    pub engine: Arc<MatchEngine>,
    /// Peer-to-peer payload forwarder.
    pub relay: SignalingRelay,
    /// Chat history, profiles, and reports.
    pub store: Arc<dyn Store>,
    /// STUN/TURN URLs for `GET /api/config`.
    pub ice_servers: Arc<[String]>,
    /// Cap for the chat history endpoint.
    pub message_history_limit: u32,
}

impl AppState {
    /// Wires the engine and store into handler state using `config`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: &GatewayConfig) -> Self {
        let engine = Arc::new(MatchEngine::with_policy(config.match_policy));
        let relay = SignalingRelay::new(Arc::clone(&engine), Arc::clone(&store));
        Self {
            engine,
            relay,
            store,
            ice_servers: config.ice_servers.clone().into(),
            message_history_limit: config.message_history_limit,
        }
    }
}
