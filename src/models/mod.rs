// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Card, CardExchange, CardResponse, ConnectionId, PlayerId, Profile, ResponseKind, SessionId, WaitingEntry};
pub use requests::{ClientEvent, JoinWaitingRequest, RespondCardRequest, SubmitCardRequest};
pub use responses::{
    ErrorResponse, GameState, GameUpdate, HealthResponse, MatchFound, PlayerDisconnected, QueueStatus, ServerEvent,
    StageComplete, StatusResponse,
};
