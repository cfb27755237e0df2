use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::core::catalog::{Catalog, CatalogCursor};
use crate::core::error::EngineError;
use crate::models::{Card, CardExchange, CardResponse, GameState, PlayerId, Profile, ResponseKind, SessionId};

/// Compatibility at which a stage is complete
pub const COMPLETION_THRESHOLD: u32 = 100;

/// Where a session is in its turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// `turn` is expected to submit a card
    AwaitingQuestion,
    /// `turn` is expected to respond to the pending card
    AwaitingResponse,
}

/// Outcome of a successful respond
#[derive(Debug, Clone, PartialEq)]
pub struct RespondOutcome {
    /// State after the response, before any stage reset
    pub update: GameState,
    /// New stage number if the threshold was crossed
    pub stage_completed: Option<u32>,
}

/// Two-player card exchange
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: SessionId,
    pub players: [PlayerId; 2],
    pub turn: PlayerId,
    pub stage: u32,
    pub compatibility: u32,
    pub history: Vec<CardExchange>,
    #[serde(rename = "startedAt")]
    pub started_at: DateTime<Utc>,
    /// Suggested prompt for the current asker
    pub prompt: Option<String>,
    #[serde(skip)]
    profiles: [Profile; 2],
    #[serde(skip)]
    cursor: CatalogCursor,
}

impl Session {
    /// Start a session; the requester takes the first turn
    pub fn new(
        requester: (PlayerId, Profile),
        partner: (PlayerId, Profile),
        catalog: &Catalog,
    ) -> Self {
        let cursor = catalog.cursor();
        Self {
            id: SessionId::new(),
            players: [requester.0, partner.0],
            turn: requester.0,
            stage: 1,
            compatibility: 0,
            history: Vec::new(),
            started_at: Utc::now(),
            prompt: catalog.prompt_at(&cursor).map(str::to_string),
            profiles: [requester.1, partner.1],
            cursor,
        }
    }

    pub fn contains(&self, player: &PlayerId) -> bool {
        self.players.contains(player)
    }

    /// The counterpart of `player`, if `player` is seated here
    pub fn other_player(&self, player: &PlayerId) -> Option<PlayerId> {
        match self.players {
            [a, b] if a == *player => Some(b),
            [a, b] if b == *player => Some(a),
            _ => None,
        }
    }

    pub fn profile_of(&self, player: &PlayerId) -> Option<&Profile> {
        self.players
            .iter()
            .position(|p| p == player)
            .map(|i| &self.profiles[i])
    }

    /// Stable profile ids of both players, in seat order
    pub fn unique_ids(&self) -> [String; 2] {
        [self.profiles[0].unique_id.clone(), self.profiles[1].unique_id.clone()]
    }

    pub fn phase(&self) -> TurnPhase {
        match self.history.last() {
            Some(last) if last.is_pending() => TurnPhase::AwaitingResponse,
            _ => TurnPhase::AwaitingQuestion,
        }
    }

    pub fn state(&self) -> GameState {
        GameState {
            turn: self.turn,
            history: self.history.clone(),
            compatibility: self.compatibility,
            prompt: self.prompt.clone(),
        }
    }

    /// Append a card from the turn holder and hand the turn over
    pub fn submit(&mut self, actor: PlayerId, card: Card) -> Result<GameState, EngineError> {
        if actor != self.turn {
            return Err(EngineError::WrongTurn);
        }
        if self.phase() == TurnPhase::AwaitingResponse {
            return Err(EngineError::InvalidResponse("previous card has not been answered"));
        }
        let other = self
            .other_player(&actor)
            .ok_or(EngineError::WrongTurn)?;

        self.history.push(CardExchange {
            from: actor,
            card,
            response: None,
            timestamp: Utc::now(),
        });
        self.turn = other;

        Ok(self.state())
    }

    /// Record a response to the pending card
    ///
    /// The turn returns to the asker. The stage check runs after the
    /// update snapshot is taken, so the update carries the raw total and
    /// the reset is reported separately.
    pub fn respond(
        &mut self,
        actor: PlayerId,
        kind: ResponseKind,
        catalog: &Catalog,
    ) -> Result<RespondOutcome, EngineError> {
        let last = self
            .history
            .last_mut()
            .ok_or(EngineError::InvalidResponse("no card to respond to"))?;
        if !last.is_pending() {
            return Err(EngineError::InvalidResponse("card already answered"));
        }
        if last.from == actor {
            return Err(EngineError::InvalidResponse("cannot respond to your own card"));
        }
        if !self.players.contains(&actor) {
            return Err(EngineError::InvalidResponse("not a player in this session"));
        }

        last.response = Some(CardResponse {
            by: actor,
            value: kind,
            timestamp: Utc::now(),
        });
        let asker = last.from;

        self.compatibility += kind.delta();
        self.turn = asker;
        self.cursor.advance(catalog);
        self.prompt = catalog.prompt_at(&self.cursor).map(str::to_string);

        let update = self.state();
        let stage_completed = self.complete_stage_if_due();

        Ok(RespondOutcome {
            update,
            stage_completed,
        })
    }

    // Overflow past the threshold is discarded
    fn complete_stage_if_due(&mut self) -> Option<u32> {
        if self.compatibility < COMPLETION_THRESHOLD {
            return None;
        }
        self.stage += 1;
        self.compatibility = 0;
        Some(self.stage)
    }
}
