// Database engine backend using SurrealDB
// Connects through the `any` engine so the same code serves ws://, http:// and mem:// URLs

use std::path::Path;

use async_trait::async_trait;
use carlettos_common::{
    AffectedRows, CarlettosError, DEFAULT_DATABASE, DEFAULT_NAMESPACE, LeaderboardEntry, Task,
    Vote, Votes,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use tracing::{debug, info, warn};

use crate::model::{ChessGame, StorageMode};
use crate::traits::PersistenceService;
use crate::traits::chess::ChessPersistence;
use crate::traits::leaderboard::{LeaderboardPersistence, sort_by_score};
use crate::traits::task::TaskPersistence;
use crate::traits::vote::VotePersistence;

const TB_TASKS: &str = "tasks";
const TB_CHESS: &str = "chess";
const TB_VOTES: &str = "vote";
const TB_HIGHSCORES: &str = "c2048";

const CHESS_KEY: i64 = 0;

/// Connection settings for the database engine
#[derive(Debug, Clone)]
pub struct SurrealConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    /// Root credentials; embedded engines run without authentication
    pub credentials: Option<(String, String)>,
}

impl SurrealConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            credentials: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaskRow {
    uid: String,
    title: String,
    completed: bool,
    created_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.uid,
            title: row.title,
            completed: row.completed,
            created_at: row.created_at,
        }
    }
}

/// The board travels as a JSON document string.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChessRow {
    board: String,
}

impl ChessRow {
    fn encode(game: &ChessGame) -> anyhow::Result<Self> {
        Ok(Self {
            board: serde_json::to_string(&game.board)?,
        })
    }

    fn decode(self) -> anyhow::Result<ChessGame> {
        Ok(ChessGame::new(serde_json::from_str(&self.board)?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VotesRow {
    uid: String,
    votes: Vec<Vote>,
}

impl From<VotesRow> for Votes {
    fn from(row: VotesRow) -> Self {
        Votes {
            id: row.uid,
            votes: row.votes,
        }
    }
}

impl From<&Votes> for VotesRow {
    fn from(votes: &Votes) -> Self {
        Self {
            uid: votes.id.clone(),
            votes: votes.votes.clone(),
        }
    }
}

fn db_error(e: surrealdb::Error) -> anyhow::Error {
    anyhow::Error::new(CarlettosError::DatabaseError(e.to_string()))
}

/// Persistence backed by the SurrealDB database engine
pub struct SurrealPersistService {
    db: Surreal<Any>,
    config: SurrealConfig,
}

impl SurrealPersistService {
    /// Connect, sign in when credentials are configured and select the
    /// namespace and database
    pub async fn connect(config: SurrealConfig) -> anyhow::Result<Self> {
        let db = any::connect(config.url.as_str()).await.map_err(db_error)?;
        let service = Self { db, config };
        service.root_signin().await?;
        service
            .db
            .use_ns(service.config.namespace.as_str())
            .use_db(service.config.database.as_str())
            .await
            .map_err(db_error)?;
        info!(
            url = %service.config.url,
            namespace = %service.config.namespace,
            database = %service.config.database,
            "Connected to database engine"
        );
        Ok(service)
    }

    async fn root_signin(&self) -> anyhow::Result<()> {
        let Some((username, password)) = &self.config.credentials else {
            return Ok(());
        };
        self.db
            .signin(Root {
                username: username.as_str(),
                password: password.as_str(),
            })
            .await
            .map_err(db_error)?;
        Ok(())
    }

    /// Signs in again when the session was dropped by the engine
    async fn ensure_session(&self) -> anyhow::Result<()> {
        if self.config.credentials.is_none() {
            return Ok(());
        }
        if let Err(e) = self.db.query("RETURN true").await.and_then(|r| r.check()) {
            warn!(error = %e, "Database session lost, signing in again");
            self.root_signin().await?;
        }
        Ok(())
    }

    /// Load a SurrealQL script into the selected namespace and database
    pub async fn import(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        self.ensure_session().await?;
        self.db.import(path.as_ref()).await.map_err(db_error)?;
        info!(path = %path.as_ref().display(), "Script imported");
        Ok(())
    }

    async fn select_votes(&self, id: &str) -> anyhow::Result<Option<Votes>> {
        let row: Option<VotesRow> = self.db.select((TB_VOTES, id)).await.map_err(db_error)?;
        Ok(row.map(Into::into))
    }

    async fn store_votes(&self, votes: &Votes) -> anyhow::Result<Votes> {
        let row: Option<VotesRow> = self
            .db
            .upsert((TB_VOTES, votes.id.as_str()))
            .content(VotesRow::from(votes))
            .await
            .map_err(db_error)?;
        row.map(Into::into)
            .ok_or_else(|| CarlettosError::not_found(votes.id.as_str()))
    }

    async fn update_votes(
        &self,
        id: &str,
        change: impl FnOnce(&mut Votes) -> bool + Send,
    ) -> anyhow::Result<Votes> {
        self.ensure_session().await?;
        let mut votes = self
            .select_votes(id)
            .await?
            .unwrap_or_else(|| Votes::empty(id));
        if change(&mut votes) {
            return self.store_votes(&votes).await;
        }
        Ok(votes)
    }
}

#[async_trait]
impl TaskPersistence for SurrealPersistService {
    async fn task_create(&self, title: &str) -> anyhow::Result<Task> {
        self.ensure_session().await?;
        let row = TaskRow {
            uid: uuid::Uuid::new_v4().simple().to_string(),
            title: title.to_string(),
            completed: false,
            created_at: Utc::now(),
        };
        let created: Option<TaskRow> = self
            .db
            .create((TB_TASKS, row.uid.as_str()))
            .content(row.clone())
            .await
            .map_err(db_error)?;
        debug!(id = %row.uid, "Task created");
        created
            .map(Into::into)
            .ok_or_else(|| CarlettosError::not_found(row.uid))
    }

    async fn task_find(&self, id: &str) -> anyhow::Result<Option<Task>> {
        self.ensure_session().await?;
        let row: Option<TaskRow> = self.db.select((TB_TASKS, id)).await.map_err(db_error)?;
        Ok(row.map(Into::into))
    }

    async fn task_find_all(&self) -> anyhow::Result<Vec<Task>> {
        self.ensure_session().await?;
        let rows: Vec<TaskRow> = self.db.select(TB_TASKS).await.map_err(db_error)?;
        let mut tasks: Vec<Task> = rows.into_iter().map(Into::into).collect();
        tasks.sort_by_key(|task| task.created_at);
        Ok(tasks)
    }

    async fn task_toggle(&self, id: &str) -> anyhow::Result<AffectedRows> {
        self.ensure_session().await?;
        let row: Option<TaskRow> = self.db.select((TB_TASKS, id)).await.map_err(db_error)?;
        let Some(mut row) = row else {
            return Err(CarlettosError::not_found(id));
        };
        row.completed = !row.completed;
        let updated: Option<TaskRow> = self
            .db
            .update((TB_TASKS, id))
            .content(row)
            .await
            .map_err(db_error)?;
        match updated {
            Some(_) => Ok(AffectedRows::new(1)),
            None => Err(CarlettosError::not_found(id)),
        }
    }

    async fn task_delete(&self, id: &str) -> anyhow::Result<AffectedRows> {
        self.ensure_session().await?;
        let _: Option<TaskRow> = self.db.delete((TB_TASKS, id)).await.map_err(db_error)?;
        Ok(AffectedRows::new(1))
    }
}

#[async_trait]
impl ChessPersistence for SurrealPersistService {
    async fn chess_init(&self) -> anyhow::Result<ChessGame> {
        if let Some(game) = self.chess_get().await? {
            return Ok(game);
        }
        let game = ChessGame::default();
        let created: Option<ChessRow> = self
            .db
            .create((TB_CHESS, CHESS_KEY))
            .content(ChessRow::encode(&game)?)
            .await
            .map_err(db_error)?;
        info!("Chess game created");
        created
            .ok_or_else(|| CarlettosError::not_found("chess game"))?
            .decode()
    }

    async fn chess_get(&self) -> anyhow::Result<Option<ChessGame>> {
        self.ensure_session().await?;
        let row: Option<ChessRow> = self
            .db
            .select((TB_CHESS, CHESS_KEY))
            .await
            .map_err(db_error)?;
        row.map(ChessRow::decode).transpose()
    }

    async fn chess_update(&self, game: ChessGame) -> anyhow::Result<ChessGame> {
        self.ensure_session().await?;
        let updated: Option<ChessRow> = self
            .db
            .upsert((TB_CHESS, CHESS_KEY))
            .content(ChessRow::encode(&game)?)
            .await
            .map_err(db_error)?;
        updated
            .ok_or_else(|| CarlettosError::not_found("chess game"))?
            .decode()
    }
}

#[async_trait]
impl VotePersistence for SurrealPersistService {
    async fn votes_get(&self, id: &str) -> anyhow::Result<Votes> {
        self.ensure_session().await?;
        match self.select_votes(id).await? {
            Some(votes) => Ok(votes),
            None => self.store_votes(&Votes::empty(id)).await,
        }
    }

    async fn votes_add(&self, id: &str, vote_id: usize) -> anyhow::Result<Votes> {
        self.update_votes(id, |votes| votes.add(vote_id)).await
    }

    async fn votes_remove(&self, id: &str, vote_id: usize) -> anyhow::Result<Votes> {
        self.update_votes(id, |votes| votes.remove(vote_id)).await
    }
}

#[async_trait]
impl LeaderboardPersistence for SurrealPersistService {
    async fn highscore_add(&self, entry: LeaderboardEntry) -> anyhow::Result<LeaderboardEntry> {
        self.ensure_session().await?;
        let created: Option<LeaderboardEntry> = self
            .db
            .create(TB_HIGHSCORES)
            .content(entry.clone())
            .await
            .map_err(db_error)?;
        Ok(created.unwrap_or(entry))
    }

    async fn highscore_find_all(&self) -> anyhow::Result<Vec<LeaderboardEntry>> {
        self.ensure_session().await?;
        let mut entries: Vec<LeaderboardEntry> =
            self.db.select(TB_HIGHSCORES).await.map_err(db_error)?;
        sort_by_score(&mut entries);
        Ok(entries)
    }
}

#[async_trait]
impl PersistenceService for SurrealPersistService {
    fn storage_mode(&self) -> StorageMode {
        StorageMode::Database
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        self.db.health().await.map_err(db_error)?;
        Ok(())
    }
}
