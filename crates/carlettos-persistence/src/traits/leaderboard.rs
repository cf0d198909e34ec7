//! 2048 leaderboard persistence trait

use async_trait::async_trait;
use carlettos_common::LeaderboardEntry;

#[async_trait]
pub trait LeaderboardPersistence: Send + Sync {
    async fn highscore_add(&self, entry: LeaderboardEntry) -> anyhow::Result<LeaderboardEntry>;

    /// All entries, best score first
    async fn highscore_find_all(&self) -> anyhow::Result<Vec<LeaderboardEntry>>;
}

/// Orders entries by score, highest first.
pub fn sort_by_score(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
}
