//! Persisted records: chat messages, user profiles, abuse reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{ClientId, RoomId};

/// A chat message row from the `messages` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StoredMessage {
    /// Message identifier.
    pub id: Uuid,
    /// Room the message was sent in.
    pub room_id: RoomId,
    /// Client that sent it.
    pub sender_id: ClientId,
    /// Message body.
    pub message: String,
    /// Server receive time.
    pub timestamp: DateTime<Utc>,
}

impl StoredMessage {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(room_id: RoomId, sender_id: ClientId, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            sender_id,
            message,
            timestamp: Utc::now(),
        }
    }
}

/// An anonymous user profile row from the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    /// Profile identifier.
    pub id: Uuid,
    /// Optional display name.
    pub username: Option<String>,
    /// Declared interests.
    pub interests: Vec<String>,
    /// Optional age.
    pub age: Option<i32>,
    /// Optional gender.
    pub gender: Option<String>,
    /// Preferred language code.
    pub language: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// An abuse report row from the `reports` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Report {
    /// Report identifier.
    pub id: Uuid,
    /// Client that filed the report.
    pub reporter_id: String,
    /// Client being reported.
    pub reported_id: String,
    /// Free-text reason.
    pub reason: String,
    /// Filing time.
    pub timestamp: DateTime<Utc>,
}
