//! Vote persistence trait

use async_trait::async_trait;
use carlettos_common::Votes;

/// Vote persistence operations
///
/// Each voter owns a single record holding at most three distinct votes.
#[async_trait]
pub trait VotePersistence: Send + Sync {
    /// Get the votes of a voter, creating an empty record on first access
    async fn votes_get(&self, id: &str) -> anyhow::Result<Votes>;

    /// Cast a vote; the record is returned unchanged when the vote is
    /// already cast or the voter has no votes left
    async fn votes_add(&self, id: &str, vote_id: usize) -> anyhow::Result<Votes>;

    /// Withdraw a vote
    async fn votes_remove(&self, id: &str, vote_id: usize) -> anyhow::Result<Votes>;
}
