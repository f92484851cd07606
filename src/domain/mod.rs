//! Domain layer: identifiers, session state, and the pairing structures.
//!
//! These types are plain data with no locking of their own. The
//! [`crate::service::MatchEngine`] owns one instance of each structure and
//! serializes every mutation behind a single lock.

pub mod client_id;
pub mod matcher;
pub mod registry;
pub mod room_id;
pub mod room_table;
pub mod session;
pub mod waiting_pool;

pub use client_id::ClientId;
pub use matcher::{MatchPolicy, MatchScorer};
pub use registry::{ClientSender, ConnectionRegistry, Delivery};
pub use room_id::RoomId;
pub use room_table::{Room, RoomTable};
pub use session::{ClientSession, Interests, SessionSnapshot, SessionStatus};
pub use waiting_pool::{WaitingEntry, WaitingPool};
