//! Connection registry: client identifier → live session and transport.
//!
//! The transport handle is the sending half of an unbounded channel whose
//! receiver is drained by the connection's writer task. Sending never
//! suspends, so it is safe to do while holding the engine lock.

use std::collections::HashMap;

use tokio::sync::mpsc;

use super::ClientId;
use super::session::ClientSession;
use crate::error::GatewayError;
use crate::ws::messages::ServerMessage;

/// Outbound handle for one connection.
pub type ClientSender = mpsc::UnboundedSender<ServerMessage>;

/// Result of handing a message to a client's transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Queued for the writer task.
    Sent,
    /// No session is registered under that identifier.
    Absent,
    /// The writer task is gone; the transport is closed.
    Broken,
}

/// Owns every live [`ClientSession`].
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    sessions: HashMap<ClientId, ClientSession>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new session in the `Connected` state.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DuplicateClient`] if `client_id` is already
    /// registered. The existing session is left untouched.
    pub fn connect(&mut self, client_id: ClientId, sender: ClientSender) -> Result<(), GatewayError> {
        if self.sessions.contains_key(&client_id) {
            return Err(GatewayError::DuplicateClient(client_id));
        }
        self.sessions.insert(client_id, ClientSession::new(sender));
        Ok(())
    }

    /// Removes a session and its transport handle. Absent ids are a no-op.
    pub fn disconnect(&mut self, client_id: &ClientId) -> Option<ClientSession> {
        self.sessions.remove(client_id)
    }

    /// Queues `message` on the client's transport.
    pub fn send(&self, client_id: &ClientId, message: ServerMessage) -> Delivery {
        let Some(session) = self.sessions.get(client_id) else {
            return Delivery::Absent;
        };
        match session.sender.send(message) {
            Ok(()) => Delivery::Sent,
            Err(_) => Delivery::Broken,
        }
    }

    /// Returns `true` if `client_id` is registered with exactly this transport.
    #[must_use]
    pub fn is_bound_to(&self, client_id: &ClientId, sender: &ClientSender) -> bool {
        self.sessions
            .get(client_id)
            .is_some_and(|s| s.sender.same_channel(sender))
    }

    /// Looks up a session.
    #[must_use]
    pub fn get(&self, client_id: &ClientId) -> Option<&ClientSession> {
        self.sessions.get(client_id)
    }

    /// Looks up a session for mutation.
    pub fn get_mut(&mut self, client_id: &ClientId) -> Option<&mut ClientSession> {
        self.sessions.get_mut(client_id)
    }

    /// Returns `true` if `client_id` is registered.
    #[must_use]
    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.sessions.contains_key(client_id)
    }

    /// Iterates all sessions in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&ClientId, &ClientSession)> {
        self.sessions.iter()
    }

    /// Number of registered sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if nobody is connected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
