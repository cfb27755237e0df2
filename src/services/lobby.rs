use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use crate::core::{Effects, Engine, EngineError, JournalEntry, Notification, Recipient};
use crate::models::{ClientEvent, ConnectionId, ErrorResponse, PlayerId, Profile, ServerEvent, StatusResponse};
use crate::services::postgres::PostgresClient;

/// Outbound half of a connection, drained by its writer task
pub type Outbox = mpsc::UnboundedSender<ServerEvent>;

#[derive(Debug, Error)]
pub enum LobbyError {
    #[error("Lobby is not running")]
    Closed,
}

/// Ordered queue of journal entries, drained by a background writer task
///
/// The lobby only enqueues; the writer appends entries to PostgreSQL one
/// at a time in the order they were produced.
#[derive(Debug, Clone)]
pub struct JournalWriter {
    tx: mpsc::UnboundedSender<JournalEntry>,
}

impl JournalWriter {
    /// Writer without a consumer; entries are read from the returned receiver
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<JournalEntry>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Spawn the task that appends entries to `store`
    pub fn spawn(store: Arc<PostgresClient>) -> Self {
        let (writer, mut rx) = Self::channel();
        tokio::spawn(async move {
            while let Some(entry) = rx.recv().await {
                // Failures never roll back engine state
                if let Err(e) = store.append(&entry).await {
                    tracing::warn!("Failed to persist journal entry {:?}: {}", entry, e);
                }
            }
            tracing::info!("Journal writer stopped");
        });
        writer
    }

    fn enqueue(&self, entry: JournalEntry) {
        if let Err(e) = self.tx.send(entry) {
            tracing::warn!("Journal writer is gone, dropping {:?}", e.0);
        }
    }
}

/// What happens to journal entries produced by the engine
pub enum SessionPolicy {
    /// Session state lives only in process memory
    InMemory,
    /// Matches and actions are also appended to PostgreSQL
    Durable(JournalWriter),
}

impl SessionPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            SessionPolicy::InMemory => "memory",
            SessionPolicy::Durable(_) => "durable",
        }
    }

    fn write(&self, journal: Vec<JournalEntry>) {
        if let SessionPolicy::Durable(writer) = self {
            for entry in journal {
                writer.enqueue(entry);
            }
        }
    }
}

/// Messages processed by the lobby, strictly one at a time
#[derive(Debug)]
pub enum LobbyCommand {
    Connect {
        connection: ConnectionId,
        outbox: Outbox,
    },
    Event {
        connection: ConnectionId,
        event: ClientEvent,
    },
    Disconnect {
        connection: ConnectionId,
    },
    Status {
        reply: oneshot::Sender<StatusResponse>,
    },
}

/// Cloneable sender side of the lobby
#[derive(Debug, Clone)]
pub struct LobbyHandle {
    tx: mpsc::UnboundedSender<LobbyCommand>,
}

impl LobbyHandle {
    pub fn connect(&self, connection: ConnectionId, outbox: Outbox) -> Result<(), LobbyError> {
        self.send(LobbyCommand::Connect { connection, outbox })
    }

    pub fn dispatch(&self, connection: ConnectionId, event: ClientEvent) -> Result<(), LobbyError> {
        self.send(LobbyCommand::Event { connection, event })
    }

    pub fn disconnect(&self, connection: ConnectionId) -> Result<(), LobbyError> {
        self.send(LobbyCommand::Disconnect { connection })
    }

    /// Pool size and session count, answered in event order
    pub async fn status(&self) -> Result<StatusResponse, LobbyError> {
        let (reply, rx) = oneshot::channel();
        self.send(LobbyCommand::Status { reply })?;
        rx.await.map_err(|_| LobbyError::Closed)
    }

    fn send(&self, command: LobbyCommand) -> Result<(), LobbyError> {
        self.tx.send(command).map_err(|_| LobbyError::Closed)
    }
}

/// Single-owner actor around the [`Engine`]
///
/// Every inbound event is handled to completion before the next one, so the
/// waiting pool and the session registry never need a lock. The lobby also
/// keeps the directory from connections to players; the engine only ever
/// sees [`PlayerId`]s.
pub struct Lobby {
    engine: Engine,
    policy: SessionPolicy,
    players: HashMap<ConnectionId, PlayerId>,
    outboxes: HashMap<PlayerId, Outbox>,
    rx: mpsc::UnboundedReceiver<LobbyCommand>,
}

impl Lobby {
    pub fn new(engine: Engine, policy: SessionPolicy) -> (Self, LobbyHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let lobby = Self {
            engine,
            policy,
            players: HashMap::new(),
            outboxes: HashMap::new(),
            rx,
        };
        (lobby, LobbyHandle { tx })
    }

    /// Process commands until every handle is dropped
    pub async fn run(mut self) {
        tracing::info!("Lobby started (session policy: {})", self.policy.name());
        while let Some(command) = self.rx.recv().await {
            self.handle(command);
        }
        tracing::info!("Lobby stopped");
    }

    fn handle(&mut self, command: LobbyCommand) {
        match command {
            LobbyCommand::Connect { connection, outbox } => {
                let player = PlayerId::new();
                self.players.insert(connection, player);
                self.outboxes.insert(player, outbox);
                tracing::info!("Connection {} bound to player {}", connection, player);
            }
            LobbyCommand::Event { connection, event } => {
                let Some(player) = self.players.get(&connection).copied() else {
                    tracing::warn!("Dropping {} from unknown connection {}", event.name(), connection);
                    return;
                };
                tracing::debug!("Player {} sent {}", player, event.name());

                match self.apply(player, event) {
                    Ok(effects) => self.commit(effects),
                    Err(e) => {
                        tracing::debug!("Rejected event from player {}: {}", player, e);
                        self.send_to(player, ServerEvent::Error(ErrorResponse::from(&e)));
                    }
                }
            }
            LobbyCommand::Disconnect { connection } => {
                let Some(player) = self.players.remove(&connection) else {
                    return;
                };
                self.outboxes.remove(&player);
                let effects = self.engine.disconnect(player);
                self.commit(effects);
                tracing::info!("Connection {} (player {}) disconnected", connection, player);
            }
            LobbyCommand::Status { reply } => {
                let _ = reply.send(self.engine.status());
            }
        }
    }

    fn apply(&mut self, player: PlayerId, event: ClientEvent) -> Result<Effects, EngineError> {
        match event {
            ClientEvent::JoinWaiting(request) => self.engine.join(player, Profile::try_from(request)?),
            ClientEvent::LeaveWaiting => Ok(self.engine.leave(player)),
            ClientEvent::SubmitCard(req) => self.engine.submit(req.session_id, player, req.card),
            ClientEvent::RespondCard(req) => self.engine.respond(req.session_id, player, req.response),
        }
    }

    // Notifications are queued before the journal is written
    fn commit(&mut self, effects: Effects) {
        self.deliver(effects.notifications);
        self.policy.write(effects.journal);
    }

    fn deliver(&self, notifications: Vec<Notification>) {
        for notification in notifications {
            match notification.recipient {
                Recipient::Player(player) => self.send_to(player, notification.event),
                Recipient::Everyone => {
                    for outbox in self.outboxes.values() {
                        let _ = outbox.send(notification.event.clone());
                    }
                }
            }
        }
    }

    // Best-effort: a vanished player is not an error
    fn send_to(&self, player: PlayerId, event: ServerEvent) {
        if let Some(outbox) = self.outboxes.get(&player) {
            let _ = outbox.send(event);
        }
    }
}
