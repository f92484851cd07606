//! Service layer: pairing, lifecycle, and relay orchestration.
//!
//! [`MatchEngine`] is the single writer for all shared pairing state.
//! [`SignalingRelay`] routes peer-to-peer payloads through it and hands
//! chat text to the persistence layer.

pub mod match_engine;
pub mod relay;

pub use match_engine::{EngineStats, LeaveOutcome, MatchEngine, MatchOutcome};
pub use relay::{RelayOutcome, Signal, SignalingRelay};
