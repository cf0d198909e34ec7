//! Domain model types for the persistence abstraction layer
//!
//! Tasks, votes and highscores are the shared records from `carlettos-common`;
//! only the types specific to storage live here.

use carlettos_chess::Board;
use serde::{Deserialize, Serialize};

/// Key of the single shared chess game
pub const CHESS_GAME_ID: &str = "0";

/// The shared classic chess game
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChessGame {
    pub board: Board,
}

impl ChessGame {
    pub fn new(board: Board) -> Self {
        Self { board }
    }
}

/// Storage mode for the persistence layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageMode {
    /// Embedded RocksDB inside the API process
    Embedded,
    /// External database engine (SurrealDB)
    Database,
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageMode::Embedded => write!(f, "embedded"),
            StorageMode::Database => write!(f, "database"),
        }
    }
}

impl std::str::FromStr for StorageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "embedded" => Ok(StorageMode::Embedded),
            "database" => Ok(StorageMode::Database),
            _ => Err(format!("Invalid storage mode: {}", s)),
        }
    }
}
