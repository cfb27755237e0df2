use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;
use crate::core::JournalEntry;
use crate::models::{ResponseKind, SessionId};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Action column values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_action", rename_all = "lowercase")]
pub enum MatchAction {
    Like,
    Skip,
    Compromise,
}

impl From<ResponseKind> for MatchAction {
    fn from(value: ResponseKind) -> Self {
        match value {
            ResponseKind::Like => MatchAction::Like,
            ResponseKind::Skip => MatchAction::Skip,
            ResponseKind::Compromise => MatchAction::Compromise,
        }
    }
}

/// Persisted match row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: Uuid,
    pub user_ids: Vec<String>,
    pub status: String,
    pub current_stage: i32,
    pub compatibility: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub action_count: i64,
}

/// PostgreSQL store for the durable session policy
///
/// Matches and their actions are append-only records. The row's
/// `compatibility` and `current_stage` mirror what the engine computed; the
/// action log never decides whose turn it is.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
            idle_timeout_secs.unwrap_or(600),
        )
        .await
    }

    /// Write one journal entry
    pub async fn append(&self, entry: &JournalEntry) -> Result<(), PostgresError> {
        match entry {
            JournalEntry::MatchCreated {
                session_id,
                user_ids,
                started_at,
            } => self.create_match(*session_id, user_ids, *started_at).await,
            JournalEntry::CardSubmitted {
                session_id,
                user_id,
                question,
                answer,
            } => {
                self.insert_action(*session_id, user_id, None, Some(question.as_str()), answer.as_deref())
                    .await
            }
            JournalEntry::CardAnswered {
                session_id,
                user_id,
                action,
                compatibility,
                stage,
            } => {
                self.insert_action(*session_id, user_id, Some(MatchAction::from(*action)), None, None)
                    .await?;
                self.update_progress(*session_id, *compatibility, *stage).await
            }
            JournalEntry::SessionEnded { session_id } => self.cancel_match(*session_id).await,
        }
    }

    async fn create_match(
        &self,
        session_id: SessionId,
        user_ids: &[String; 2],
        started_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO matches (id, user_ids, status, current_stage, compatibility, created_at)
            VALUES ($1, $2, 'active', 1, 0, $3)
            ON CONFLICT (id) DO NOTHING
        "#;

        sqlx::query(query)
            .bind(session_id.0)
            .bind(user_ids.to_vec())
            .bind(started_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Recorded match {} ({} / {})", session_id, user_ids[0], user_ids[1]);
        Ok(())
    }

    async fn insert_action(
        &self,
        session_id: SessionId,
        user_id: &str,
        action: Option<MatchAction>,
        question: Option<&str>,
        answer: Option<&str>,
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO match_actions (match_id, user_id, action, question, answer, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
        "#;

        sqlx::query(query)
            .bind(session_id.0)
            .bind(user_id)
            .bind(action)
            .bind(question)
            .bind(answer)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_progress(&self, session_id: SessionId, compatibility: u32, stage: u32) -> Result<(), PostgresError> {
        let query = r#"
            UPDATE matches
            SET compatibility = $2, current_stage = $3
            WHERE id = $1
        "#;

        let result = sqlx::query(query)
            .bind(session_id.0)
            .bind(compatibility as i32)
            .bind(stage as i32)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PostgresError::NotFound(session_id.to_string()));
        }
        Ok(())
    }

    async fn cancel_match(&self, session_id: SessionId) -> Result<(), PostgresError> {
        let query = r#"
            UPDATE matches
            SET status = 'cancelled', completed_at = NOW()
            WHERE id = $1 AND status = 'active'
        "#;

        sqlx::query(query).bind(session_id.0).execute(&self.pool).await?;

        tracing::debug!("Marked match {} as cancelled", session_id);
        Ok(())
    }

    /// Fetch a match with its action count
    pub async fn get_match(&self, session_id: SessionId) -> Result<MatchRecord, PostgresError> {
        let query = r#"
            SELECT m.id, m.user_ids, m.status, m.current_stage, m.compatibility,
                   m.created_at, m.completed_at,
                   (SELECT COUNT(*) FROM match_actions a WHERE a.match_id = m.id) AS action_count
            FROM matches m
            WHERE m.id = $1
        "#;

        let row = sqlx::query(query)
            .bind(session_id.0)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(session_id.to_string()))?;

        Ok(MatchRecord {
            id: row.get("id"),
            user_ids: row.get("user_ids"),
            status: row.get("status"),
            current_stage: row.get("current_stage"),
            compatibility: row.get("compatibility"),
            created_at: row.get("created_at"),
            completed_at: row.get("completed_at"),
            action_count: row.get("action_count"),
        })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
