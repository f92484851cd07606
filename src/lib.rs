//! # pairing-gateway
//!
//! WebSocket matchmaking and WebRTC signaling relay for anonymous
//! one-on-one chat.
//!
//! Clients connect over a WebSocket, announce they are ready, and are paired
//! with a waiting stranger (preferring shared interests). Once paired, the
//! gateway relays SDP offers/answers, ICE candidates, and chat text between
//! the two peers without interpreting them. Media flows peer-to-peer.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Connection loop (ws/)
//!     │
//!     ├── MatchEngine + SignalingRelay (service/)
//!     │
//!     ├── ConnectionRegistry, WaitingPool, RoomTable (domain/)
//!     │
//!     └── Store: PostgreSQL or in-memory (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod server;
pub mod service;
pub mod ws;
