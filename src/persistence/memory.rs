//! In-process store used when persistence is disabled and in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use super::models::{Report, StoredMessage, UserProfile};
use crate::domain::RoomId;
use crate::error::GatewayError;

/// Volatile [`Store`] backed by `RwLock`-guarded collections.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    messages: RwLock<Vec<StoredMessage>>,
    users: RwLock<HashMap<Uuid, UserProfile>>,
    reports: RwLock<Vec<Report>>,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every filed report, oldest first.
    pub async fn reports(&self) -> Vec<Report> {
        self.reports.read().await.clone()
    }

    #[cfg(test)]
    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), GatewayError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GatewayError::PersistenceError("store is read-only".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn save_message(&self, message: &StoredMessage) -> Result<(), GatewayError> {
        self.check_writable()?;
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn list_messages(&self, room_id: RoomId, limit: u32) -> Result<Vec<StoredMessage>, GatewayError> {
        let messages = self.messages.read().await;
        let mut in_room: Vec<&StoredMessage> =
            messages.iter().filter(|m| m.room_id == room_id).collect();
        // Saves run on detached tasks and may land out of send order.
        in_room.sort_by_key(|m| m.timestamp);
        Ok(in_room
            .into_iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create_user(&self, user: &UserProfile) -> Result<(), GatewayError> {
        self.check_writable()?;
        self.users.write().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserProfile>, GatewayError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create_report(&self, report: &Report) -> Result<(), GatewayError> {
        self.check_writable()?;
        self.reports.write().await.push(report.clone());
        Ok(())
    }
}
