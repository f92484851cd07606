//! PostgreSQL implementation of the persistence layer.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::Store;
use super::models::{Report, StoredMessage, UserProfile};
use crate::config::GatewayConfig;
use crate::domain::{ClientId, RoomId};
use crate::error::GatewayError;

/// Idempotent schema, applied statement by statement at startup.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (\
        id UUID PRIMARY KEY, \
        username TEXT, \
        interests TEXT[] NOT NULL DEFAULT '{}', \
        age INTEGER, \
        gender TEXT, \
        language TEXT, \
        created_at TIMESTAMPTZ NOT NULL)",
    "CREATE TABLE IF NOT EXISTS messages (\
        id UUID PRIMARY KEY, \
        room_id UUID NOT NULL, \
        sender_id TEXT NOT NULL, \
        message TEXT NOT NULL, \
        timestamp TIMESTAMPTZ NOT NULL)",
    "CREATE INDEX IF NOT EXISTS messages_room_id_timestamp_idx ON messages (room_id, timestamp)",
    "CREATE TABLE IF NOT EXISTS reports (\
        id UUID PRIMARY KEY, \
        reporter_id TEXT NOT NULL, \
        reported_id TEXT NOT NULL, \
        reason TEXT NOT NULL, \
        timestamp TIMESTAMPTZ NOT NULL)",
];

type UserRow = (
    Uuid,
    Option<String>,
    Vec<String>,
    Option<i32>,
    Option<String>,
    Option<String>,
    DateTime<Utc>,
);

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the database is
    /// unreachable within the configured timeout.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Creates tables and indexes that do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn init_schema(&self) -> Result<(), GatewayError> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        tracing::info!(tables = 3, "database schema ready");
        Ok(())
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn save_message(&self, message: &StoredMessage) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO messages (id, room_id, sender_id, message, timestamp) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(message.id)
        .bind(*message.room_id.as_uuid())
        .bind(message.sender_id.as_str())
        .bind(&message.message)
        .bind(message.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_messages(&self, room_id: RoomId, limit: u32) -> Result<Vec<StoredMessage>, GatewayError> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid, String, String, DateTime<Utc>)>(
            "SELECT id, room_id, sender_id, message, timestamp FROM messages \
             WHERE room_id = $1 ORDER BY timestamp ASC LIMIT $2",
        )
        .bind(*room_id.as_uuid())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, room_id, sender_id, message, timestamp)| StoredMessage {
                id,
                room_id: RoomId::from_uuid(room_id),
                sender_id: ClientId::new(sender_id),
                message,
                timestamp,
            })
            .collect())
    }

    async fn create_user(&self, user: &UserProfile) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO users (id, username, interests, age, gender, language, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.interests)
        .bind(user.age)
        .bind(&user.gender)
        .bind(&user.language)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserProfile>, GatewayError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, interests, age, gender, language, created_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(id, username, interests, age, gender, language, created_at)| UserProfile {
                id,
                username,
                interests,
                age,
                gender,
                language,
                created_at,
            },
        ))
    }

    async fn create_report(&self, report: &Report) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO reports (id, reporter_id, reported_id, reason, timestamp) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(report.id)
        .bind(&report.reporter_id)
        .bind(&report.reported_id)
        .bind(&report.reason)
        .bind(report.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
