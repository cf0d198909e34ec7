//! Task persistence trait
//!
//! Defines the interface for the todo list storage operations.

use async_trait::async_trait;
use carlettos_common::{AffectedRows, Task};

/// Task persistence operations
#[async_trait]
pub trait TaskPersistence: Send + Sync {
    /// Create an uncompleted task stamped with the current time
    async fn task_create(&self, title: &str) -> anyhow::Result<Task>;

    /// Find a task by its ID
    async fn task_find(&self, id: &str) -> anyhow::Result<Option<Task>>;

    /// Find all tasks, oldest first
    async fn task_find_all(&self) -> anyhow::Result<Vec<Task>>;

    /// Flip the completed flag, failing with `NotFound` for unknown tasks
    async fn task_toggle(&self, id: &str) -> anyhow::Result<AffectedRows>;

    /// Delete a task
    async fn task_delete(&self, id: &str) -> anyhow::Result<AffectedRows>;
}
