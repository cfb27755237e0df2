use chrono::{DateTime, Utc};
use std::collections::HashMap;
use crate::models::{PlayerId, Profile, WaitingEntry};

/// Players waiting to be paired, keyed by player identity
#[derive(Debug, Default)]
pub struct WaitingPool {
    entries: HashMap<PlayerId, WaitingEntry>,
}

impl WaitingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a waiting entry
    ///
    /// Returns `true` when the pool grew (the player was not already waiting).
    pub fn insert(&mut self, player: PlayerId, profile: Profile, joined_at: DateTime<Utc>) -> bool {
        self.entries
            .insert(player, WaitingEntry { profile, joined_at })
            .is_none()
    }

    /// Remove an entry; missing keys are fine
    pub fn remove(&mut self, player: &PlayerId) -> Option<WaitingEntry> {
        self.entries.remove(player)
    }

    pub fn get(&self, player: &PlayerId) -> Option<&WaitingEntry> {
        self.entries.get(player)
    }

    pub fn contains(&self, player: &PlayerId) -> bool {
        self.entries.contains_key(player)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &WaitingEntry)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(unique_id: &str) -> Profile {
        Profile {
            name: "Sam".to_string(),
            age: 30,
            location: "Berlin".to_string(),
            bio: "Hello".to_string(),
            unique_id: unique_id.to_string(),
            telegram_id: None,
        }
    }

    #[test]
    fn test_insert_overwrites() {
        let mut pool = WaitingPool::new();
        let player = PlayerId::new();

        assert!(pool.insert(player, profile("u1"), Utc::now()));
        assert!(!pool.insert(player, profile("u1-renamed"), Utc::now()));

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get(&player).unwrap().profile.unique_id, "u1-renamed");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut pool = WaitingPool::new();
        let player = PlayerId::new();
        pool.insert(player, profile("u1"), Utc::now());

        assert!(pool.remove(&player).is_some());
        assert!(pool.remove(&player).is_none());
        assert!(pool.is_empty());
    }
}
