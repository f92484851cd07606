//! Room table: room identifier → the two clients bound together.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ClientId, RoomId};

/// A pairing of exactly two distinct clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    /// Room identifier.
    pub room_id: RoomId,
    /// The two members, in pairing order (requester first).
    pub members: [ClientId; 2],
    /// When the pairing was made.
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Returns `true` if `client_id` is one of the members.
    #[must_use]
    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.members.iter().any(|m| m == client_id)
    }

    /// Returns the member that is not `client_id`, if `client_id` is a member.
    #[must_use]
    pub fn other(&self, client_id: &ClientId) -> Option<&ClientId> {
        let [a, b] = &self.members;
        if a == client_id {
            Some(b)
        } else if b == client_id {
            Some(a)
        } else {
            None
        }
    }
}

/// All currently open rooms.
#[derive(Debug, Default)]
pub struct RoomTable {
    rooms: HashMap<RoomId, Room>,
}

impl RoomTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a fresh room for `a` and `b` and returns its identifier.
    pub fn open(&mut self, a: ClientId, b: ClientId) -> RoomId {
        let room_id = RoomId::new();
        self.rooms.insert(
            room_id,
            Room {
                room_id,
                members: [a, b],
                created_at: Utc::now(),
            },
        );
        room_id
    }

    /// Looks up a room.
    #[must_use]
    pub fn get(&self, room_id: RoomId) -> Option<&Room> {
        self.rooms.get(&room_id)
    }

    /// Removes and returns a room.
    pub fn close(&mut self, room_id: RoomId) -> Option<Room> {
        self.rooms.remove(&room_id)
    }

    /// Iterates over all rooms in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Number of open rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if no rooms are open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
