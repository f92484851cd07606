//! Matching engine and session lifecycle.
//!
//! [`MatchEngine`] owns the connection registry, the waiting pool, and the
//! room table behind one [`tokio::sync::Mutex`]. Every transition (connect,
//! ready, leave, disconnect, and the relay's peer lookup) runs as a single
//! critical section, so the three structures are never observed out of step.
//! Transport sends are channel pushes and never suspend, so no transition
//! waits on a socket while holding the lock.
//!
//! A send that finds the transport closed marks the client as broken; once
//! the triggering transition finishes, broken clients go through the full
//! disconnect cleanup inside the same critical section.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;

use crate::domain::matcher::select_candidate;
use crate::domain::{
    ClientId, ClientSender, ConnectionRegistry, Delivery, Interests, MatchPolicy, MatchScorer,
    Room, RoomId, RoomTable, SessionSnapshot, SessionStatus, WaitingPool,
};
use crate::error::GatewayError;
use crate::ws::messages::ServerMessage;

/// Result of a `ready` transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// A partner was found and a room opened.
    Paired {
        /// The new room.
        room_id: RoomId,
        /// The partner.
        peer_id: ClientId,
    },
    /// No partner available; the client is waiting.
    Waiting,
}

/// Result of a `leave` or `disconnect` transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The client's room was dissolved and the peer notified.
    LeftRoom {
        /// The dissolved room.
        room_id: RoomId,
        /// The surviving peer.
        peer_id: ClientId,
    },
    /// The client was removed from the waiting pool.
    LeftPool,
    /// Nothing to undo.
    Idle,
}

/// Point-in-time structure sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct EngineStats {
    /// Registered sessions.
    pub online_users: usize,
    /// Entries in the waiting pool.
    pub waiting_users: usize,
    /// Open rooms.
    pub active_rooms: usize,
}

/// Pairing and relay-routing engine shared by all connections.
pub struct MatchEngine {
    state: Mutex<EngineState>,
    scorer: Arc<dyn MatchScorer>,
}

impl fmt::Debug for MatchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchEngine")
            .field("scorer", &self.scorer)
            .finish_non_exhaustive()
    }
}

impl MatchEngine {
    /// Creates an engine that ranks candidates with `scorer`.
    #[must_use]
    pub fn new(scorer: Arc<dyn MatchScorer>) -> Self {
        Self {
            state: Mutex::new(EngineState::default()),
            scorer,
        }
    }

    /// Creates an engine for a configured [`MatchPolicy`].
    #[must_use]
    pub fn with_policy(policy: MatchPolicy) -> Self {
        Self::new(policy.scorer())
    }

    /// Registers a freshly connected client.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DuplicateClient`] if the identifier is
    /// already in use. No state changes in that case.
    pub async fn connect(&self, client_id: ClientId, sender: ClientSender) -> Result<(), GatewayError> {
        let mut state = self.state.lock().await;
        state.registry.connect(client_id.clone(), sender)?;
        tracing::info!(%client_id, online = state.registry.len(), "client connected");
        Ok(())
    }

    /// Declares interests and either pairs the client or enqueues it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DanglingReference`] if the client is not
    /// registered, or [`GatewayError::Protocol`] if it is already paired.
    pub async fn ready<I>(&self, client_id: &ClientId, interests: I) -> Result<MatchOutcome, GatewayError>
    where
        I: IntoIterator<Item = String>,
    {
        let interests: Interests = interests.into_iter().collect();
        let mut state = self.state.lock().await;
        let outcome = state.ready(self.scorer.as_ref(), client_id, interests);
        state.reap_broken();
        outcome
    }

    /// Explicit leave: dissolves the room or leaves the pool, keeps the
    /// session, and acknowledges with `disconnected`.
    pub async fn leave(&self, client_id: &ClientId) -> LeaveOutcome {
        let mut state = self.state.lock().await;
        let outcome = state.leave(client_id);
        state.deliver(client_id, ServerMessage::Disconnected);
        state.reap_broken();
        outcome
    }

    /// Transport closed: full cleanup, then the session is removed.
    /// Unknown identifiers are a no-op.
    pub async fn disconnect(&self, client_id: &ClientId) -> LeaveOutcome {
        let mut state = self.state.lock().await;
        let outcome = state.disconnect(client_id);
        state.reap_broken();
        outcome
    }

    /// Like [`Self::disconnect`], but only if `client_id` is still bound to
    /// `sender`. A connection shutting down must not evict a newer session
    /// that reused its identifier.
    pub async fn disconnect_if_bound(&self, client_id: &ClientId, sender: &ClientSender) -> Option<LeaveOutcome> {
        let mut state = self.state.lock().await;
        if !state.registry.is_bound_to(client_id, sender) {
            return None;
        }
        let outcome = state.disconnect(client_id);
        state.reap_broken();
        Some(outcome)
    }

    /// Delivers `message` to a client. A closed transport triggers the
    /// disconnect cleanup for that client instead of an error.
    pub async fn send(&self, client_id: &ClientId, message: ServerMessage) -> Delivery {
        let mut state = self.state.lock().await;
        let delivery = state.deliver(client_id, message);
        state.reap_broken();
        delivery
    }

    /// Builds a message for the peer of `from` and delivers it within the
    /// same critical section as the room lookup, so the payload can never
    /// reach a client that has since left the room. `None` if `from` is not
    /// paired.
    pub async fn relay_to_peer<F>(&self, from: &ClientId, build: F) -> Option<(RoomId, ClientId, Delivery)>
    where
        F: FnOnce(RoomId, &ClientId) -> ServerMessage,
    {
        let mut state = self.state.lock().await;
        let (room_id, peer_id) = state.peer_of(from)?;
        let message = build(room_id, &peer_id);
        let delivery = state.deliver(&peer_id, message);
        state.reap_broken();
        Some((room_id, peer_id, delivery))
    }

    /// Resolves the room and peer of a paired client.
    pub async fn peer_of(&self, client_id: &ClientId) -> Option<(RoomId, ClientId)> {
        let state = self.state.lock().await;
        state.peer_of(client_id)
    }

    /// Returns current structure sizes.
    pub async fn stats(&self) -> EngineStats {
        let state = self.state.lock().await;
        EngineStats {
            online_users: state.registry.len(),
            waiting_users: state.waiting.len(),
            active_rooms: state.rooms.len(),
        }
    }

    /// Returns a snapshot of one session.
    pub async fn session(&self, client_id: &ClientId) -> Option<SessionSnapshot> {
        let state = self.state.lock().await;
        state
            .registry
            .get(client_id)
            .map(|s| SessionSnapshot::of(client_id, s))
    }

    /// Returns a copy of one room.
    pub async fn room(&self, room_id: RoomId) -> Option<Room> {
        let state = self.state.lock().await;
        state.rooms.get(room_id).cloned()
    }
}

/// The three shared structures plus transitions over them.
#[derive(Debug, Default)]
struct EngineState {
    registry: ConnectionRegistry,
    waiting: WaitingPool,
    rooms: RoomTable,
    /// Clients whose transport failed during the current transition.
    broken: Vec<ClientId>,
}

impl EngineState {
    fn deliver(&mut self, client_id: &ClientId, message: ServerMessage) -> Delivery {
        let kind = message.kind();
        let delivery = self.registry.send(client_id, message);
        match delivery {
            Delivery::Sent => {}
            Delivery::Absent => {
                tracing::debug!(%client_id, kind, "recipient not registered, message dropped");
            }
            Delivery::Broken => {
                tracing::warn!(%client_id, kind, "transport closed, scheduling cleanup");
                if !self.broken.contains(client_id) {
                    self.broken.push(client_id.clone());
                }
            }
        }
        delivery
    }

    fn reap_broken(&mut self) {
        while let Some(client_id) = self.broken.pop() {
            self.disconnect(&client_id);
        }
    }

    fn ready(
        &mut self,
        scorer: &dyn MatchScorer,
        client_id: &ClientId,
        interests: Interests,
    ) -> Result<MatchOutcome, GatewayError> {
        let session = self
            .registry
            .get_mut(client_id)
            .ok_or_else(|| GatewayError::DanglingReference(format!("no session for {client_id}")))?;
        if let SessionStatus::Paired { room, .. } = &session.status {
            return Err(GatewayError::Protocol(format!(
                "{client_id} is already paired in room {room}"
            )));
        }
        session.interests = interests.clone();

        let peer_id = loop {
            let Some(candidate) = select_candidate(scorer, client_id, &interests, &self.waiting)
            else {
                break None;
            };
            let peer_id = candidate.entry.client_id.clone();
            let score = candidate.score;
            self.waiting.remove(&peer_id);
            if self.registry.contains(&peer_id) {
                tracing::debug!(%client_id, %peer_id, score, "candidate selected");
                break Some(peer_id);
            }
            tracing::warn!(%peer_id, "waiting entry without session discarded");
        };

        let Some(peer_id) = peer_id else {
            let appended = self.waiting.upsert(client_id, interests);
            if let Some(session) = self.registry.get_mut(client_id) {
                session.status = SessionStatus::Waiting;
            }
            tracing::info!(
                %client_id,
                refreshed = !appended,
                waiting = self.waiting.len(),
                "client waiting"
            );
            self.deliver(client_id, ServerMessage::Waiting);
            return Ok(MatchOutcome::Waiting);
        };

        self.waiting.remove(client_id);
        let room_id = self.rooms.open(client_id.clone(), peer_id.clone());
        if let Some(session) = self.registry.get_mut(client_id) {
            session.status = SessionStatus::Paired {
                peer: peer_id.clone(),
                room: room_id,
            };
        }
        if let Some(session) = self.registry.get_mut(&peer_id) {
            session.status = SessionStatus::Paired {
                peer: client_id.clone(),
                room: room_id,
            };
        }
        tracing::info!(%room_id, %client_id, %peer_id, "clients paired");

        self.deliver(
            client_id,
            ServerMessage::Paired {
                room_id,
                peer_id: peer_id.clone(),
            },
        );
        self.deliver(
            &peer_id,
            ServerMessage::Paired {
                room_id,
                peer_id: client_id.clone(),
            },
        );
        Ok(MatchOutcome::Paired { room_id, peer_id })
    }

    /// Undoes pairing or waiting for `client_id`; the session itself stays.
    fn leave(&mut self, client_id: &ClientId) -> LeaveOutcome {
        let Some(session) = self.registry.get_mut(client_id) else {
            return LeaveOutcome::Idle;
        };
        let status = std::mem::replace(&mut session.status, SessionStatus::Connected);
        tracing::debug!(%client_id, status = status.label(), "undoing session state");

        match status {
            SessionStatus::Connected => LeaveOutcome::Idle,
            SessionStatus::Waiting => {
                self.waiting.remove(client_id);
                tracing::info!(%client_id, "client left waiting pool");
                LeaveOutcome::LeftPool
            }
            SessionStatus::Paired { peer, room } => {
                let dissolved = self.rooms.close(room).is_some();
                if let Some(peer_session) = self.registry.get_mut(&peer)
                    && peer_session.status.room() == Some(room)
                {
                    peer_session.reset();
                }
                if dissolved {
                    tracing::info!(room_id = %room, %client_id, peer_id = %peer, "room dissolved");
                    self.deliver(&peer, ServerMessage::PeerDisconnected);
                } else {
                    tracing::warn!(room_id = %room, %client_id, "room already gone");
                }
                LeaveOutcome::LeftRoom {
                    room_id: room,
                    peer_id: peer,
                }
            }
        }
    }

    fn disconnect(&mut self, client_id: &ClientId) -> LeaveOutcome {
        let outcome = self.leave(client_id);
        if self.registry.disconnect(client_id).is_some() {
            tracing::info!(%client_id, online = self.registry.len(), "client disconnected");
        }
        outcome
    }

    fn peer_of(&self, client_id: &ClientId) -> Option<(RoomId, ClientId)> {
        let session = self.registry.get(client_id)?;
        let SessionStatus::Paired { peer, room } = &session.status else {
            return None;
        };
        let resolved = self.rooms.get(*room).and_then(|r| r.other(client_id));
        if resolved != Some(peer) {
            tracing::warn!(%client_id, room_id = %room, "room reference does not resolve");
            return None;
        }
        Some((*room, peer.clone()))
    }
}
