//! Persistence trait definitions
//!
//! Domain-specific traits grouped under a single `PersistenceService`
//! supertrait so the API process can hold one `Arc<dyn PersistenceService>`
//! regardless of the backend in use.

pub mod chess;
pub mod leaderboard;
pub mod task;
pub mod vote;

pub use chess::ChessPersistence;
pub use leaderboard::LeaderboardPersistence;
pub use task::TaskPersistence;
pub use vote::VotePersistence;

use async_trait::async_trait;

use crate::model::StorageMode;

/// Unified persistence service combining all domain traits
#[async_trait]
pub trait PersistenceService:
    TaskPersistence + ChessPersistence + VotePersistence + LeaderboardPersistence + Send + Sync
{
    /// Get the storage mode of this backend
    fn storage_mode(&self) -> StorageMode;

    /// Health check for the storage backend
    async fn health_check(&self) -> anyhow::Result<()>;
}
