use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::core::EngineError;
use crate::models::domain::{Card, Profile, ResponseKind, SessionId};

/// Inbound real-time event sent by a client
///
/// Wire format is an adjacently tagged JSON object:
/// ```json
/// { "event": "submitCard", "data": { "sessionId": "...", "card": { "question": "..." } } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    JoinWaiting(JoinWaitingRequest),
    LeaveWaiting,
    SubmitCard(SubmitCardRequest),
    RespondCard(RespondCardRequest),
}

/// Profile as sent with `joinWaiting`
///
/// Every field is optional and `age` is any integer so that incomplete or
/// out-of-range profiles reach validation instead of failing to parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct JoinWaitingRequest {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, range(min = 18, max = 100))]
    pub age: Option<i64>,
    #[validate(required, length(min = 1))]
    pub location: Option<String>,
    #[validate(required, length(min = 1))]
    pub bio: Option<String>,
    #[validate(required, length(min = 1))]
    #[serde(alias = "unique_id", rename = "uniqueId")]
    pub unique_id: Option<String>,
    #[serde(alias = "telegram_id", rename = "telegramId", skip_serializing_if = "Option::is_none")]
    pub telegram_id: Option<String>,
}

impl From<Profile> for JoinWaitingRequest {
    fn from(profile: Profile) -> Self {
        Self {
            name: Some(profile.name),
            age: Some(i64::from(profile.age)),
            location: Some(profile.location),
            bio: Some(profile.bio),
            unique_id: Some(profile.unique_id),
            telegram_id: profile.telegram_id,
        }
    }
}

impl TryFrom<JoinWaitingRequest> for Profile {
    type Error = EngineError;

    fn try_from(request: JoinWaitingRequest) -> Result<Self, Self::Error> {
        request.validate()?;

        let (Some(name), Some(age), Some(location), Some(bio), Some(unique_id)) = (
            request.name,
            request.age,
            request.location,
            request.bio,
            request.unique_id,
        ) else {
            return Err(EngineError::ValidationError("missing profile field".to_string()));
        };
        let age = u8::try_from(age).map_err(|_| EngineError::ValidationError(format!("age: {} is out of range", age)))?;

        Ok(Profile {
            name,
            age,
            location,
            bio,
            unique_id,
            telegram_id: request.telegram_id,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitCardRequest {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    pub card: Card,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondCardRequest {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    pub response: ResponseKind,
}

impl ClientEvent {
    /// Event name as it appears on the wire, for logging
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinWaiting(_) => "joinWaiting",
            ClientEvent::LeaveWaiting => "leaveWaiting",
            ClientEvent::SubmitCard(_) => "submitCard",
            ClientEvent::RespondCard(_) => "respondCard",
        }
    }
}
