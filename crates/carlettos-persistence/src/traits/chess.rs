//! Chess persistence trait

use async_trait::async_trait;

use crate::model::ChessGame;

/// Storage of the single shared chess game
#[async_trait]
pub trait ChessPersistence: Send + Sync {
    /// Create the game with the starting position unless it already exists
    async fn chess_init(&self) -> anyhow::Result<ChessGame>;

    async fn chess_get(&self) -> anyhow::Result<Option<ChessGame>>;

    /// Replace the stored game
    async fn chess_update(&self, game: ChessGame) -> anyhow::Result<ChessGame>;
}
