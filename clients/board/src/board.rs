//! The board: cache and API client composed into the mutation protocol
//!
//! One logical operation is two phases: the optimistic local mutation and
//! the network call. The UI serializes edits to a single task, but moves
//! on different tasks may be in flight concurrently; the cache invariant
//! holds at every settled instant.

use common::types::{TaskDto, TaskStatus};
use tracing::warn;
use uuid::Uuid;

use crate::api::{ApiClient, TaskDraft, TaskUpdate};
use crate::cache::{BoardCache, MoveMutation};
use crate::error::BoardError;

/// A kanban board backed by the REST API
pub struct Board {
    client: ApiClient,
    cache: BoardCache,
}

impl Board {
    /// Build a board over an authenticated client
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            cache: BoardCache::new(),
        }
    }

    /// The local board view
    pub fn cache(&self) -> &BoardCache {
        &self.cache
    }

    /// The underlying API client
    pub fn client_mut(&mut self) -> &mut ApiClient {
        &mut self.client
    }

    /// Fetch the kanban projection and overwrite the local view
    pub async fn refresh(&mut self) -> Result<(), BoardError> {
        let snapshot = self.client.fetch_kanban().await?;
        self.cache.replace(snapshot);
        Ok(())
    }

    /// Create a task
    ///
    /// No optimism here: the server assigns the identity, so the record
    /// enters the cache only once the request has succeeded.
    pub async fn create_task(&mut self, draft: &TaskDraft) -> Result<TaskDto, BoardError> {
        let task = self.client.create_task(draft).await?;
        self.cache.insert_confirmed(task.clone());
        Ok(task)
    }

    /// Drag a card to another column
    ///
    /// The move is applied locally before the request goes out, keeping
    /// the UI latency-free. On success nothing more happens; on any
    /// failure the optimistic state is discarded and the full projection
    /// is refetched, overwriting local state unconditionally. Should the
    /// refetch fail as well, the move is undone in place instead, so the
    /// mutation always settles.
    pub async fn move_task(
        &mut self,
        task_id: Uuid,
        to: TaskStatus,
    ) -> Result<MoveMutation, BoardError> {
        let mut mutation = self
            .cache
            .begin_move(task_id, to)
            .ok_or(BoardError::UnknownTask(task_id))?;

        match self.client.update_status(task_id, to).await {
            Ok(_) => {
                self.cache.confirm(&mut mutation);
                Ok(mutation)
            }
            Err(e) => {
                warn!("Status move failed, reverting by refetch: {}", e);
                match self.client.fetch_kanban().await {
                    Ok(snapshot) => self.cache.revert(&mut mutation, snapshot),
                    Err(fetch_err) => {
                        // The recovery refetch failed too; undo the move
                        // locally so the mutation still settles and the
                        // optimistic state does not linger.
                        warn!("Recovery refetch failed, rolling back locally: {}", fetch_err);
                        self.cache.rollback(&mut mutation);
                    }
                }
                Err(e)
            }
        }
    }

    /// Apply a full update to a task
    ///
    /// The cache moves the record between buckets when the confirmed
    /// status differs, otherwise replaces it in place.
    pub async fn update_task(
        &mut self,
        task_id: Uuid,
        update: &TaskUpdate,
    ) -> Result<TaskDto, BoardError> {
        let task = self.client.update_task(task_id, update).await?;
        self.cache.apply_update(task.clone());
        Ok(task)
    }

    /// Delete a task; removed from the cache only after confirmation
    pub async fn delete_task(&mut self, task_id: Uuid) -> Result<(), BoardError> {
        self.client.delete_task(task_id).await?;
        self.cache.remove_confirmed(task_id);
        Ok(())
    }
}
