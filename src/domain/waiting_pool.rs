//! Insertion-ordered pool of clients awaiting a partner.

use super::ClientId;
use super::session::Interests;

/// Snapshot of a waiting client's identifier and declared interests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitingEntry {
    /// Waiting client.
    pub client_id: ClientId,
    /// Interests declared with the most recent `ready`.
    pub interests: Interests,
}

/// Ordered, duplicate-free collection of [`WaitingEntry`]s.
///
/// Iteration order is arrival order; refreshing an entry's interests keeps
/// its position.
#[derive(Debug, Default)]
pub struct WaitingPool {
    entries: Vec<WaitingEntry>,
}

impl WaitingPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `client_id`, or refreshes its interests if already present.
    ///
    /// Returns `true` if a new entry was appended.
    pub fn upsert(&mut self, client_id: &ClientId, interests: Interests) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|e| &e.client_id == client_id) {
            entry.interests = interests;
            return false;
        }
        self.entries.push(WaitingEntry {
            client_id: client_id.clone(),
            interests,
        });
        true
    }

    /// Removes `client_id` if present, returning its entry.
    pub fn remove(&mut self, client_id: &ClientId) -> Option<WaitingEntry> {
        let pos = self.entries.iter().position(|e| &e.client_id == client_id)?;
        Some(self.entries.remove(pos))
    }

    /// Returns `true` if `client_id` is waiting.
    #[must_use]
    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.entries.iter().any(|e| &e.client_id == client_id)
    }

    /// Iterates entries in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &WaitingEntry> {
        self.entries.iter()
    }

    /// Number of waiting clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nobody is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interests(tags: &[&str]) -> Interests {
        tags.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn upsert_preserves_arrival_order() {
        let mut pool = WaitingPool::new();
        assert!(pool.upsert(&ClientId::from("a"), Interests::new()));
        assert!(pool.upsert(&ClientId::from("b"), Interests::new()));
        let order: Vec<&str> = pool.iter().map(|e| e.client_id.as_str()).collect();
        assert_eq!(order, ["a", "b"]);
    }

    #[test]
    fn upsert_refreshes_without_duplicating() {
        let mut pool = WaitingPool::new();
        pool.upsert(&ClientId::from("a"), interests(&["music"]));
        pool.upsert(&ClientId::from("b"), Interests::new());
        assert!(!pool.upsert(&ClientId::from("a"), interests(&["art"])));

        assert_eq!(pool.len(), 2);
        let first = pool.iter().next().cloned();
        assert_eq!(
            first,
            Some(WaitingEntry {
                client_id: ClientId::from("a"),
                interests: interests(&["art"]),
            })
        );
    }

    #[test]
    fn remove_returns_entry_once() {
        let mut pool = WaitingPool::new();
        pool.upsert(&ClientId::from("a"), Interests::new());
        assert!(pool.remove(&ClientId::from("a")).is_some());
        assert!(pool.remove(&ClientId::from("a")).is_none());
        assert!(pool.is_empty());
        assert!(!pool.contains(&ClientId::from("a")));
    }
}
