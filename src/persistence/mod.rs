//! Persistence layer: chat history, user profiles, and reports.
//!
//! The [`Store`] trait is the only thing the rest of the gateway sees.
//! [`postgres::PostgresStore`] is the production backend;
//! [`memory::InMemoryStore`] backs tests and deployments with persistence
//! disabled.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::RoomId;
use crate::error::GatewayError;
use models::{Report, StoredMessage, UserProfile};

/// Storage backend for everything outside the in-memory pairing state.
#[async_trait]
pub trait Store: Send + Sync + fmt::Debug {
    /// Appends a chat message.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on backend failure.
    async fn save_message(&self, message: &StoredMessage) -> Result<(), GatewayError>;

    /// Returns up to `limit` messages of a room, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on backend failure.
    async fn list_messages(&self, room_id: RoomId, limit: u32) -> Result<Vec<StoredMessage>, GatewayError>;

    /// Inserts a new user profile.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on backend failure.
    async fn create_user(&self, user: &UserProfile) -> Result<(), GatewayError>;

    /// Fetches a user profile by id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on backend failure.
    async fn get_user(&self, id: Uuid) -> Result<Option<UserProfile>, GatewayError>;

    /// Files an abuse report.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on backend failure.
    async fn create_report(&self, report: &Report) -> Result<(), GatewayError>;
}
