use chrono::{DateTime, Utc};
use std::sync::Arc;
use validator::Validate;
use crate::core::{
    catalog::Catalog,
    error::EngineError,
    matcher::Matchmaker,
    pool::WaitingPool,
    registry::SessionRegistry,
    session::Session,
};
use crate::models::{
    Card, GameUpdate, MatchFound, PlayerDisconnected, PlayerId, Profile, QueueStatus, ResponseKind, ServerEvent,
    SessionId, StageComplete, StatusResponse,
};

/// Who an outbound event is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Player(PlayerId),
    Everyone,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub recipient: Recipient,
    pub event: ServerEvent,
}

/// Record of a state change, written by the durable session policy
#[derive(Debug, Clone, PartialEq)]
pub enum JournalEntry {
    MatchCreated {
        session_id: SessionId,
        user_ids: [String; 2],
        started_at: DateTime<Utc>,
    },
    CardSubmitted {
        session_id: SessionId,
        user_id: String,
        question: String,
        answer: Option<String>,
    },
    CardAnswered {
        session_id: SessionId,
        user_id: String,
        action: ResponseKind,
        compatibility: u32,
        stage: u32,
    },
    SessionEnded {
        session_id: SessionId,
    },
}

/// Everything an operation produced, in application order
#[derive(Debug, Default)]
pub struct Effects {
    pub notifications: Vec<Notification>,
    pub journal: Vec<JournalEntry>,
}

impl Effects {
    fn notify(&mut self, player: PlayerId, event: ServerEvent) {
        self.notifications.push(Notification {
            recipient: Recipient::Player(player),
            event,
        });
    }

    fn broadcast(&mut self, event: ServerEvent) {
        self.notifications.push(Notification {
            recipient: Recipient::Everyone,
            event,
        });
    }

    fn record(&mut self, entry: JournalEntry) {
        self.journal.push(entry);
    }

    fn append(&mut self, other: Effects) {
        self.notifications.extend(other.notifications);
        self.journal.extend(other.journal);
    }
}

/// Matchmaking and turn engine
///
/// Owns the waiting pool and the session registry. All methods run to
/// completion synchronously; callers must serialize access (the lobby actor
/// owns the only instance).
#[derive(Debug)]
pub struct Engine {
    pool: WaitingPool,
    registry: SessionRegistry,
    matchmaker: Matchmaker,
    catalog: Arc<Catalog>,
}

impl Engine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            pool: WaitingPool::new(),
            registry: SessionRegistry::new(),
            matchmaker: Matchmaker::new(),
            catalog,
        }
    }

    pub fn pool(&self) -> &WaitingPool {
        &self.pool
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            waiting_players: self.pool.len(),
            active_sessions: self.registry.len(),
        }
    }

    /// Add `player` to the waiting pool and try to pair it
    ///
    /// Malformed profiles are rejected before touching the pool, and so is a
    /// player still seated in a session.
    pub fn join(&mut self, player: PlayerId, profile: Profile) -> Result<Effects, EngineError> {
        profile.validate()?;
        if !self.registry.sessions_of(&player).is_empty() {
            return Err(EngineError::ValidationError("already playing in a session".to_string()));
        }

        let mut effects = Effects::default();
        let grew = self.pool.insert(player, profile, Utc::now());
        if grew {
            effects.broadcast(ServerEvent::WaitingCount(self.pool.len()));
        }
        effects.notify(
            player,
            ServerEvent::QueueStatus(QueueStatus {
                position: self.pool.len(),
                message: "You are in the waiting queue".to_string(),
            }),
        );

        effects.append(self.attempt_pair(player));
        Ok(effects)
    }

    /// Remove `player` from the waiting pool; absent players are ignored
    pub fn leave(&mut self, player: PlayerId) -> Effects {
        let mut effects = Effects::default();
        if self.pool.remove(&player).is_some() {
            effects.broadcast(ServerEvent::WaitingCount(self.pool.len()));
            effects.notify(
                player,
                ServerEvent::QueueStatus(QueueStatus {
                    position: 0,
                    message: "You have left the waiting queue".to_string(),
                }),
            );
        }
        effects
    }

    /// Pair `player` with the longest-waiting eligible partner
    pub fn attempt_pair(&mut self, player: PlayerId) -> Effects {
        let mut effects = Effects::default();

        let Some(found) = self.matchmaker.find_partner(&self.pool, player) else {
            tracing::debug!("No partner available for player {}", player);
            return effects;
        };

        let (Some(requester), Some(partner)) = (
            self.pool.remove(&found.requester),
            self.pool.remove(&found.partner),
        ) else {
            return effects;
        };

        let session = Session::new(
            (found.requester, requester.profile.clone()),
            (found.partner, partner.profile.clone()),
            &self.catalog,
        );
        let session_id = session.id;

        tracing::info!(
            "Match created: {} ({} vs {}), {} players still waiting",
            session_id,
            requester.profile.name,
            partner.profile.name,
            self.pool.len()
        );

        effects.record(JournalEntry::MatchCreated {
            session_id,
            user_ids: session.unique_ids(),
            started_at: session.started_at,
        });
        effects.notify(
            found.requester,
            ServerEvent::MatchFound(MatchFound {
                session_id,
                opponent: partner.profile,
                session: session.clone(),
            }),
        );
        effects.notify(
            found.partner,
            ServerEvent::MatchFound(MatchFound {
                session_id,
                opponent: requester.profile,
                session: session.clone(),
            }),
        );
        effects.broadcast(ServerEvent::WaitingCount(self.pool.len()));

        self.registry.insert(session);
        effects
    }

    /// Submit a card on behalf of the turn holder
    pub fn submit(&mut self, session_id: SessionId, actor: PlayerId, card: Card) -> Result<Effects, EngineError> {
        let session = self
            .registry
            .get_mut(&session_id)
            .ok_or(EngineError::NotFound(session_id))?;
        if actor != session.turn {
            return Err(EngineError::WrongTurn);
        }
        card.validate()?;

        let state = session.submit(actor, card.clone())?;

        let mut effects = Effects::default();
        if let Some(profile) = session.profile_of(&actor) {
            effects.record(JournalEntry::CardSubmitted {
                session_id,
                user_id: profile.unique_id.clone(),
                question: card.question,
                answer: card.answer,
            });
        }
        for player in session.players {
            effects.notify(
                player,
                ServerEvent::GameUpdate(GameUpdate {
                    session_id,
                    session: state.clone(),
                }),
            );
        }

        tracing::debug!("Card submitted in session {}, turn passes to {}", session_id, session.turn);
        Ok(effects)
    }

    /// Respond to the pending card
    pub fn respond(
        &mut self,
        session_id: SessionId,
        actor: PlayerId,
        kind: ResponseKind,
    ) -> Result<Effects, EngineError> {
        let session = self
            .registry
            .get_mut(&session_id)
            .ok_or(EngineError::NotFound(session_id))?;

        let outcome = session.respond(actor, kind, &self.catalog)?;

        let mut effects = Effects::default();
        if let Some(profile) = session.profile_of(&actor) {
            effects.record(JournalEntry::CardAnswered {
                session_id,
                user_id: profile.unique_id.clone(),
                action: kind,
                compatibility: session.compatibility,
                stage: session.stage,
            });
        }

        // Turn update first, stage completion as a separate follow-up
        for player in session.players {
            effects.notify(
                player,
                ServerEvent::GameUpdate(GameUpdate {
                    session_id,
                    session: outcome.update.clone(),
                }),
            );
        }
        if let Some(stage) = outcome.stage_completed {
            tracing::info!("Session {} reached stage {}", session_id, stage);
            for player in session.players {
                effects.notify(player, ServerEvent::StageComplete(StageComplete { session_id, stage }));
            }
        }

        Ok(effects)
    }

    /// Drop `player` from the pool and end every session it is seated in
    pub fn disconnect(&mut self, player: PlayerId) -> Effects {
        let mut effects = Effects::default();

        if self.pool.remove(&player).is_some() {
            effects.broadcast(ServerEvent::WaitingCount(self.pool.len()));
        }

        for session_id in self.registry.sessions_of(&player) {
            let Some(session) = self.registry.remove(&session_id) else {
                continue;
            };
            if let Some(other) = session.other_player(&player) {
                effects.notify(
                    other,
                    ServerEvent::PlayerDisconnected(PlayerDisconnected {
                        session_id,
                        message: "Other player disconnected".to_string(),
                    }),
                );
            }
            effects.record(JournalEntry::SessionEnded { session_id });
            tracing::info!("Session {} ended: player {} disconnected", session_id, player);
        }

        effects
    }
}
