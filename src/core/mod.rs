// Core engine exports
pub mod catalog;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod pool;
pub mod registry;
pub mod session;

pub use catalog::{Catalog, CatalogCursor, CatalogError, Category};
pub use engine::{Effects, Engine, JournalEntry, Notification, Recipient};
pub use error::EngineError;
pub use matcher::{MatchResult, Matchmaker};
pub use pool::WaitingPool;
pub use registry::SessionRegistry;
pub use session::{RespondOutcome, Session, TurnPhase, COMPLETION_THRESHOLD};
