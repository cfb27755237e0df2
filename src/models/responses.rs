use serde::{Deserialize, Serialize};
use crate::core::session::Session;
use crate::models::domain::{CardExchange, PlayerId, Profile, SessionId};

/// Outbound real-time event pushed to one or all connections
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Current waiting pool size, broadcast to everyone
    WaitingCount(usize),
    QueueStatus(QueueStatus),
    MatchFound(MatchFound),
    GameUpdate(GameUpdate),
    StageComplete(StageComplete),
    PlayerDisconnected(PlayerDisconnected),
    Error(ErrorResponse),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueStatus {
    pub position: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchFound {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    pub opponent: Profile,
    pub session: Session,
}

/// Turn state pushed to both players after every submit/respond
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    pub turn: PlayerId,
    pub history: Vec<CardExchange>,
    pub compatibility: u32,
    /// Suggested catalog prompt for the player whose turn it is
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameUpdate {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    pub session: GameState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageComplete {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    pub stage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerDisconnected {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    pub message: String,
}

/// Status endpoint response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(rename = "waitingPlayers")]
    pub waiting_players: usize,
    #[serde(rename = "activeSessions")]
    pub active_sessions: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response, used both over HTTP and as the `error` event payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}
