//! Greedy partner selection over the waiting pool.
//!
//! One selection routine parameterized by a [`MatchScorer`]. The highest
//! score wins; among equal scores the earliest arrival wins, so a scorer
//! that always returns zero degenerates to plain FIFO matching.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::ClientId;
use super::session::Interests;
use super::waiting_pool::{WaitingEntry, WaitingPool};
use crate::error::GatewayError;

/// Scores how well a waiting candidate suits a requester. Higher is better.
pub trait MatchScorer: Send + Sync + fmt::Debug {
    /// Returns the compatibility score of `candidate` for `requester`.
    fn score(&self, requester: &Interests, candidate: &Interests) -> usize;
}

/// Scores by the number of shared interests.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterestOverlap;

impl MatchScorer for InterestOverlap {
    fn score(&self, requester: &Interests, candidate: &Interests) -> usize {
        requester.intersection(candidate).count()
    }
}

/// Ignores interests entirely; every candidate scores zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fifo;

impl MatchScorer for Fifo {
    fn score(&self, _requester: &Interests, _candidate: &Interests) -> usize {
        0
    }
}

/// Configurable matching policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Prefer the candidate sharing the most interests.
    #[default]
    Interests,
    /// Pair strictly by arrival order.
    Fifo,
}

impl MatchPolicy {
    /// Builds the scorer implementing this policy.
    #[must_use]
    pub fn scorer(self) -> Arc<dyn MatchScorer> {
        match self {
            Self::Interests => Arc::new(InterestOverlap),
            Self::Fifo => Arc::new(Fifo),
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interests" => Ok(Self::Interests),
            "fifo" => Ok(Self::Fifo),
            other => Err(GatewayError::InvalidRequest(format!(
                "unknown match policy: {other}"
            ))),
        }
    }
}

/// A chosen candidate together with its score.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// The winning waiting entry.
    pub entry: &'a WaitingEntry,
    /// Its score against the requester.
    pub score: usize,
}

/// Picks the best waiting partner for `requester`, skipping the requester
/// itself. Only a strictly better score displaces the current best.
#[must_use]
pub fn select_candidate<'a>(
    scorer: &dyn MatchScorer,
    requester: &ClientId,
    interests: &Interests,
    pool: &'a WaitingPool,
) -> Option<Candidate<'a>> {
    let mut best: Option<Candidate<'a>> = None;
    for entry in pool.iter().filter(|e| &e.client_id != requester) {
        let score = scorer.score(interests, &entry.interests);
        if best.is_none_or(|b| score > b.score) {
            best = Some(Candidate { entry, score });
        }
    }
    best
}
