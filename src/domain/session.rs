//! Per-client session state.
//!
//! A [`ClientSession`] is created when a transport connects and destroyed
//! when it disconnects. Its [`SessionStatus`] carries the peer and room
//! references only in the `Paired` state, so "peer present iff paired"
//! holds by construction.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::registry::ClientSender;
use super::{ClientId, RoomId};

/// Declared interests of a client. Ordered for stable logging and snapshots.
pub type Interests = BTreeSet<String>;

/// Lifecycle state of a client session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionStatus {
    /// Connected, neither waiting nor in a room.
    Connected,
    /// Sitting in the waiting pool.
    Waiting,
    /// Bound to a peer inside a room.
    Paired {
        /// The other member of the room.
        peer: ClientId,
        /// The room both members belong to.
        room: RoomId,
    },
}

impl SessionStatus {
    /// Returns the room reference if paired.
    #[must_use]
    pub fn room(&self) -> Option<RoomId> {
        match self {
            Self::Paired { room, .. } => Some(*room),
            Self::Connected | Self::Waiting => None,
        }
    }

    /// Returns the peer reference if paired.
    #[must_use]
    pub fn peer(&self) -> Option<&ClientId> {
        match self {
            Self::Paired { peer, .. } => Some(peer),
            Self::Connected | Self::Waiting => None,
        }
    }

    /// Short label used in log fields.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Waiting => "waiting",
            Self::Paired { .. } => "paired",
        }
    }
}

/// Live session owned by the connection registry.
#[derive(Debug)]
pub struct ClientSession {
    /// Outbound transport handle. Only the registry sends through it.
    pub(crate) sender: ClientSender,
    /// Current lifecycle state.
    pub status: SessionStatus,
    /// Most recently declared interests.
    pub interests: Interests,
    /// When the transport connected.
    pub connected_at: DateTime<Utc>,
}

impl ClientSession {
    /// Creates a session in the `Connected` state.
    #[must_use]
    pub fn new(sender: ClientSender) -> Self {
        Self {
            sender,
            status: SessionStatus::Connected,
            interests: Interests::new(),
            connected_at: Utc::now(),
        }
    }

    /// Drops any peer/room reference and returns to `Connected`.
    pub fn reset(&mut self) {
        self.status = SessionStatus::Connected;
    }
}

/// Read-only copy of a session for introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Client identifier.
    pub client_id: ClientId,
    /// Lifecycle state with peer/room references.
    #[serde(flatten)]
    pub status: SessionStatus,
    /// Declared interests.
    pub interests: Vec<String>,
    /// Connection timestamp.
    pub connected_at: DateTime<Utc>,
}

impl SessionSnapshot {
    /// Builds a snapshot of `session` registered under `client_id`.
    #[must_use]
    pub fn of(client_id: &ClientId, session: &ClientSession) -> Self {
        Self {
            client_id: client_id.clone(),
            status: session.status.clone(),
            interests: session.interests.iter().cloned().collect(),
            connected_at: session.connected_at,
        }
    }
}
