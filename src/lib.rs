//! Cardmatch - real-time matchmaking and card-exchange service
//!
//! Pairs anonymous players from a waiting pool into two-player sessions and
//! runs the turn-based question/answer exchange that builds up a
//! compatibility score across stages.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Catalog, Engine, EngineError, Matchmaker, Session, COMPLETION_THRESHOLD};
pub use models::{ClientEvent, PlayerId, Profile, ResponseKind, ServerEvent, SessionId};
pub use services::{Lobby, LobbyHandle, SessionPolicy};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let engine = Engine::new(std::sync::Arc::new(Catalog::default()));
        assert_eq!(engine.status().waiting_players, 0);
        assert_eq!(COMPLETION_THRESHOLD, 100);
    }
}
