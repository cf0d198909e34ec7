//! Carlettos Persistence - storage for tasks, the shared chess game, votes and highscores
//!
//! This crate provides:
//! - Persistence trait abstractions shared by every backend
//! - An embedded RocksDB backend for single-process deployments
//! - A SurrealDB backend reaching the database engine over any engine URL
//! - Domain model types for persistence operations

pub mod embedded;
pub mod model;
pub mod surreal;
pub mod traits;

// Re-export persistence traits
pub use traits::{
    ChessPersistence, LeaderboardPersistence, PersistenceService, TaskPersistence,
    VotePersistence,
};

// Re-export embedded backend
pub use embedded::EmbeddedPersistService;

// Re-export database engine backend
pub use surreal::{SurrealConfig, SurrealPersistService};

// Re-export model types
pub use model::{ChessGame, StorageMode};
