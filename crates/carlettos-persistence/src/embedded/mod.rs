// Embedded persistence backend using RocksDB
// Runs the API process without a database engine; every record is stored as JSON

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use carlettos_common::{AffectedRows, CarlettosError, LeaderboardEntry, Task, Votes};
use parking_lot::Mutex;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info};

use crate::model::{CHESS_GAME_ID, ChessGame, StorageMode};
use crate::traits::PersistenceService;
use crate::traits::chess::ChessPersistence;
use crate::traits::leaderboard::{LeaderboardPersistence, sort_by_score};
use crate::traits::task::TaskPersistence;
use crate::traits::vote::VotePersistence;

pub const CF_TASKS: &str = "tasks";
pub const CF_CHESS: &str = "chess";
pub const CF_VOTES: &str = "votes";
pub const CF_HIGHSCORES: &str = "highscores";

const COLUMN_FAMILIES: [&str; 4] = [CF_TASKS, CF_CHESS, CF_VOTES, CF_HIGHSCORES];

/// Embedded persistence using RocksDB
///
/// Read-modify-write operations (toggling a task, casting a vote) are
/// serialized through `write_lock`.
pub struct EmbeddedPersistService {
    db: Arc<DB>,
    write_lock: Mutex<()>,
}

impl EmbeddedPersistService {
    /// Open (or create) the store at `path` with all column families
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let cfs = COLUMN_FAMILIES
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&db_opts, path.as_ref(), cfs)
            .map_err(|e| anyhow::anyhow!("RocksDB open error: {}", e))?;
        info!(path = %path.as_ref().display(), "Embedded storage opened");

        Ok(Self::new(Arc::new(db)))
    }

    /// Create from a raw RocksDB instance
    pub fn new(db: Arc<DB>) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
        }
    }

    /// Get a column family handle
    fn cf(&self, name: &str) -> anyhow::Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| anyhow::anyhow!("Column family '{}' not found", name))
    }

    /// Write a record as JSON to a column family
    fn put_json<T: Serialize>(&self, cf_name: &str, key: &str, value: &T) -> anyhow::Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value)?;
        self.db
            .put_cf(cf, key.as_bytes(), bytes)
            .map_err(|e| anyhow::anyhow!("RocksDB put error: {}", e))
    }

    /// Read a JSON record from a column family
    fn get_json<T: DeserializeOwned>(&self, cf_name: &str, key: &str) -> anyhow::Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        let bytes = self
            .db
            .get_cf(cf, key.as_bytes())
            .map_err(|e| anyhow::anyhow!("RocksDB get error: {}", e))?;
        bytes
            .map(|bytes| serde_json::from_slice(&bytes))
            .transpose()
            .map_err(Into::into)
    }

    /// Read every record of a column family in key order
    fn scan_json<T: DeserializeOwned>(&self, cf_name: &str) -> anyhow::Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        self.db
            .iterator_cf(cf, IteratorMode::Start)
            .map(|item| {
                let (_, value) = item.map_err(|e| anyhow::anyhow!("RocksDB scan error: {}", e))?;
                Ok(serde_json::from_slice(&value)?)
            })
            .collect()
    }

    /// Delete a key from a column family
    fn delete_key(&self, cf_name: &str, key: &str) -> anyhow::Result<()> {
        let cf = self.cf(cf_name)?;
        self.db
            .delete_cf(cf, key.as_bytes())
            .map_err(|e| anyhow::anyhow!("RocksDB delete error: {}", e))
    }

    /// Keys that keep insertion order under RocksDB's byte ordering
    fn ordered_key() -> String {
        let nanos = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .max(0);
        format!("{:020}-{}", nanos, uuid::Uuid::new_v4().simple())
    }

    /// Apply `change` to the voter's record; it is written only when it is
    /// new or `change` reports a modification
    fn update_votes(
        &self,
        id: &str,
        change: impl FnOnce(&mut Votes) -> bool,
    ) -> anyhow::Result<Votes> {
        let _guard = self.write_lock.lock();
        let (mut votes, exists) = match self.get_json::<Votes>(CF_VOTES, id)? {
            Some(votes) => (votes, true),
            None => (Votes::empty(id), false),
        };
        if change(&mut votes) || !exists {
            self.put_json(CF_VOTES, id, &votes)?;
        }
        Ok(votes)
    }
}

#[async_trait]
impl TaskPersistence for EmbeddedPersistService {
    async fn task_create(&self, title: &str) -> anyhow::Result<Task> {
        let task = Task::new(uuid::Uuid::new_v4().simple().to_string(), title.to_string());
        self.put_json(CF_TASKS, &task.id, &task)?;
        debug!(id = %task.id, "Task created");
        Ok(task)
    }

    async fn task_find(&self, id: &str) -> anyhow::Result<Option<Task>> {
        self.get_json(CF_TASKS, id)
    }

    async fn task_find_all(&self) -> anyhow::Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self.scan_json(CF_TASKS)?;
        tasks.sort_by_key(|task| task.created_at);
        Ok(tasks)
    }

    async fn task_toggle(&self, id: &str) -> anyhow::Result<AffectedRows> {
        let _guard = self.write_lock.lock();
        let mut task: Task = self
            .get_json(CF_TASKS, id)?
            .ok_or_else(|| CarlettosError::not_found(id))?;
        task.completed = !task.completed;
        self.put_json(CF_TASKS, id, &task)?;
        Ok(AffectedRows::new(1))
    }

    async fn task_delete(&self, id: &str) -> anyhow::Result<AffectedRows> {
        self.delete_key(CF_TASKS, id)?;
        Ok(AffectedRows::new(1))
    }
}

#[async_trait]
impl ChessPersistence for EmbeddedPersistService {
    async fn chess_init(&self) -> anyhow::Result<ChessGame> {
        let _guard = self.write_lock.lock();
        if let Some(game) = self.get_json(CF_CHESS, CHESS_GAME_ID)? {
            return Ok(game);
        }
        let game = ChessGame::default();
        self.put_json(CF_CHESS, CHESS_GAME_ID, &game)?;
        info!("Chess game created");
        Ok(game)
    }

    async fn chess_get(&self) -> anyhow::Result<Option<ChessGame>> {
        self.get_json(CF_CHESS, CHESS_GAME_ID)
    }

    async fn chess_update(&self, game: ChessGame) -> anyhow::Result<ChessGame> {
        self.put_json(CF_CHESS, CHESS_GAME_ID, &game)?;
        Ok(game)
    }
}

#[async_trait]
impl VotePersistence for EmbeddedPersistService {
    async fn votes_get(&self, id: &str) -> anyhow::Result<Votes> {
        if let Some(votes) = self.get_json(CF_VOTES, id)? {
            return Ok(votes);
        }
        self.update_votes(id, |_| false)
    }

    async fn votes_add(&self, id: &str, vote_id: usize) -> anyhow::Result<Votes> {
        self.update_votes(id, |votes| votes.add(vote_id))
    }

    async fn votes_remove(&self, id: &str, vote_id: usize) -> anyhow::Result<Votes> {
        self.update_votes(id, |votes| votes.remove(vote_id))
    }
}

#[async_trait]
impl LeaderboardPersistence for EmbeddedPersistService {
    async fn highscore_add(&self, entry: LeaderboardEntry) -> anyhow::Result<LeaderboardEntry> {
        self.put_json(CF_HIGHSCORES, &Self::ordered_key(), &entry)?;
        Ok(entry)
    }

    async fn highscore_find_all(&self) -> anyhow::Result<Vec<LeaderboardEntry>> {
        let mut entries = self.scan_json(CF_HIGHSCORES)?;
        sort_by_score(&mut entries);
        Ok(entries)
    }
}

#[async_trait]
impl PersistenceService for EmbeddedPersistService {
    fn storage_mode(&self) -> StorageMode {
        StorageMode::Embedded
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        for name in COLUMN_FAMILIES {
            self.cf(name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carlettos_chess::Piece;
    use tempfile::TempDir;

    async fn create_test_service() -> (EmbeddedPersistService, TempDir) {
        let tmp_dir = TempDir::new().unwrap();
        let service = EmbeddedPersistService::open(tmp_dir.path()).unwrap();
        (service, tmp_dir)
    }

    fn entry(name: &str, score: usize) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.to_string(),
            score,
            max_tile: 128,
            min_energy: -4,
            max_energy: 20,
        }
    }

    // ==================== Task Tests ====================

    #[tokio::test]
    async fn test_task_create_and_find() {
        let (svc, _tmp) = create_test_service().await;

        let task = svc.task_create("buy milk").await.unwrap();
        assert_eq!(task.title, "buy milk");
        assert!(!task.completed);

        let found = svc.task_find(&task.id).await.unwrap().unwrap();
        assert_eq!(found, task);
        assert!(svc.task_find("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_task_find_all_by_creation_time() {
        let (svc, _tmp) = create_test_service().await;

        let first = svc.task_create("first").await.unwrap();
        let second = svc.task_create("second").await.unwrap();
        let third = svc.task_create("third").await.unwrap();

        let tasks = svc.task_find_all().await.unwrap();
        let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), second.id.as_str(), third.id.as_str()]);
    }

    #[tokio::test]
    async fn test_task_toggle_and_delete() {
        let (svc, _tmp) = create_test_service().await;
        let task = svc.task_create("toggle me").await.unwrap();

        assert_eq!(svc.task_toggle(&task.id).await.unwrap(), AffectedRows::new(1));
        assert!(svc.task_find(&task.id).await.unwrap().unwrap().completed);
        svc.task_toggle(&task.id).await.unwrap();
        assert!(!svc.task_find(&task.id).await.unwrap().unwrap().completed);

        assert_eq!(svc.task_delete(&task.id).await.unwrap(), AffectedRows::new(1));
        assert!(svc.task_find(&task.id).await.unwrap().is_none());
        // deleting twice still reports one row
        assert_eq!(svc.task_delete(&task.id).await.unwrap(), AffectedRows::new(1));
    }

    #[tokio::test]
    async fn test_task_toggle_missing() {
        let (svc, _tmp) = create_test_service().await;
        let err = svc.task_toggle("nope").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CarlettosError>(),
            Some(CarlettosError::NotFound(_))
        ));
    }

    // ==================== Chess Tests ====================

    #[tokio::test]
    async fn test_chess_init_is_idempotent() {
        let (svc, _tmp) = create_test_service().await;
        assert!(svc.chess_get().await.unwrap().is_none());

        let mut game = svc.chess_init().await.unwrap();
        assert_eq!(game, ChessGame::default());

        game.board.on_click((4, 6));
        game.board.on_click((4, 4));
        svc.chess_update(game.clone()).await.unwrap();

        let again = svc.chess_init().await.unwrap();
        assert_eq!(again, game);
        assert!(matches!(again.board.get((4, 4)), Some(Piece::Pawn { .. })));
    }

    // ==================== Vote Tests ====================

    #[tokio::test]
    async fn test_votes_get_creates_empty_record() {
        let (svc, _tmp) = create_test_service().await;
        let votes = svc.votes_get("alice").await.unwrap();
        assert_eq!(votes, Votes::empty("alice"));
    }

    #[tokio::test]
    async fn test_votes_add_and_remove() {
        let (svc, _tmp) = create_test_service().await;

        svc.votes_add("bob", 1).await.unwrap();
        svc.votes_add("bob", 1).await.unwrap();
        svc.votes_add("bob", 2).await.unwrap();
        svc.votes_add("bob", 3).await.unwrap();
        let full = svc.votes_add("bob", 4).await.unwrap();
        assert_eq!(full.votes.len(), 3);
        assert!(!full.contains(4));

        let removed = svc.votes_remove("bob", 2).await.unwrap();
        assert!(!removed.contains(2));
        assert_eq!(svc.votes_get("bob").await.unwrap(), removed);
    }

    #[tokio::test]
    async fn test_rejected_vote_leaves_record_untouched() {
        let (svc, _tmp) = create_test_service().await;
        let stored = br#"{ "id": "carol", "votes": [ { "id": 1 } ] }"#;
        let cf = svc.cf(CF_VOTES).unwrap();
        svc.db.put_cf(cf, b"carol", stored).unwrap();

        let votes = svc.votes_add("carol", 1).await.unwrap();
        assert!(votes.contains(1));
        svc.votes_remove("carol", 7).await.unwrap();

        let raw = svc.db.get_cf(cf, b"carol").unwrap().unwrap();
        assert_eq!(raw.as_slice(), stored.as_slice());

        svc.votes_add("carol", 2).await.unwrap();
        let raw = svc.db.get_cf(cf, b"carol").unwrap().unwrap();
        assert_ne!(raw.as_slice(), stored.as_slice());
    }

    // ==================== Leaderboard Tests ====================

    #[tokio::test]
    async fn test_highscores_sorted_by_score() {
        let (svc, _tmp) = create_test_service().await;

        svc.highscore_add(entry("low", 100)).await.unwrap();
        svc.highscore_add(entry("high", 3000)).await.unwrap();
        svc.highscore_add(entry("mid", 900)).await.unwrap();

        let names: Vec<_> = svc
            .highscore_find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }

    #[tokio::test]
    async fn test_reopen_keeps_data() {
        let tmp_dir = TempDir::new().unwrap();
        let id = {
            let svc = EmbeddedPersistService::open(tmp_dir.path()).unwrap();
            svc.task_create("persisted").await.unwrap().id
        };
        let svc = EmbeddedPersistService::open(tmp_dir.path()).unwrap();
        assert_eq!(svc.task_find(&id).await.unwrap().unwrap().title, "persisted");
        svc.health_check().await.unwrap();
        assert_eq!(svc.storage_mode(), StorageMode::Embedded);
    }
}
