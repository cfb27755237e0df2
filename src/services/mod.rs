// Service exports
pub mod lobby;
pub mod postgres;

pub use lobby::{JournalWriter, Lobby, LobbyCommand, LobbyError, LobbyHandle, Outbox, SessionPolicy};
pub use postgres::{MatchAction, MatchRecord, PostgresClient, PostgresError};
