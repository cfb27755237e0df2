use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Transient identity of a player, scoped to one live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a WebSocket connection, mapped to a [`PlayerId`] by the lobby
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display profile sent by a player when joining the waiting pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Profile {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 18, max = 100))]
    pub age: u8,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(length(min = 1))]
    pub bio: String,
    /// Stable identifier that survives reconnects; never matched against itself
    #[validate(length(min = 1))]
    #[serde(rename = "uniqueId")]
    pub unique_id: String,
    #[serde(rename = "telegramId", default, skip_serializing_if = "Option::is_none")]
    pub telegram_id: Option<String>,
}

/// Entry in the waiting pool
#[derive(Debug, Clone, Serialize)]
pub struct WaitingEntry {
    pub profile: Profile,
    #[serde(rename = "joinedAt")]
    pub joined_at: DateTime<Utc>,
}

/// Question card submitted by the player whose turn it is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Card {
    #[validate(length(min = 1))]
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
}

/// Reaction to the counterpart's card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Like,
    #[serde(alias = "dislike")]
    Skip,
    Compromise,
}

impl ResponseKind {
    /// Compatibility gained for this response
    pub fn delta(self) -> u32 {
        match self {
            ResponseKind::Like => 25,
            ResponseKind::Compromise => 10,
            ResponseKind::Skip => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardResponse {
    pub by: PlayerId,
    pub value: ResponseKind,
    pub timestamp: DateTime<Utc>,
}

/// One question/answer/response unit of a session's history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardExchange {
    pub from: PlayerId,
    pub card: Card,
    pub response: Option<CardResponse>,
    pub timestamp: DateTime<Utc>,
}

impl CardExchange {
    pub fn is_pending(&self) -> bool {
        self.response.is_none()
    }
}
