use std::collections::HashMap;
use crate::core::session::Session;
use crate::models::{PlayerId, SessionId};

/// Live sessions keyed by session id
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, session: Session) {
        self.sessions.insert(session.id, session);
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    pub fn remove(&mut self, id: &SessionId) -> Option<Session> {
        self.sessions.remove(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Ids of every session `player` is seated in
    pub fn sessions_of(&self, player: &PlayerId) -> Vec<SessionId> {
        self.sessions
            .values()
            .filter(|s| s.contains(player))
            .map(|s| s.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use crate::models::Profile;

    fn create_profile(unique_id: &str) -> Profile {
        Profile {
            name: "Kim".to_string(),
            age: 40,
            location: "Seoul".to_string(),
            bio: "Hiking".to_string(),
            unique_id: unique_id.to_string(),
            telegram_id: None,
        }
    }

    #[test]
    fn test_sessions_of() {
        let catalog = Catalog::default();
        let mut registry = SessionRegistry::new();
        let a = PlayerId::new();
        let b = PlayerId::new();
        let c = PlayerId::new();

        let first = Session::new((a, create_profile("u1")), (b, create_profile("u2")), &catalog);
        let first_id = first.id;
        registry.insert(first);
        registry.insert(Session::new((b, create_profile("u2")), (c, create_profile("u3")), &catalog));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.sessions_of(&a), vec![first_id]);
        assert_eq!(registry.sessions_of(&b).len(), 2);
        assert!(registry.sessions_of(&PlayerId::new()).is_empty());

        assert!(registry.remove(&first_id).is_some());
        assert!(registry.get(&first_id).is_none());
        assert_eq!(registry.len(), 1);
    }
}
