//! The board cache and its mutation protocol
//!
//! A client-side partition of the owner's tasks into the three status
//! buckets, mirroring server state with eventual consistency. Status moves
//! are applied here before the network round trip; every move carries an
//! explicit per-mutation state marker so the commit and revert paths can
//! be exercised independently of network timing.
//!
//! Invariant: after every settled (non-in-flight) operation the buckets
//! are a disjoint, exhaustive cover of the owner's tasks, with no task in
//! two buckets.

use common::types::{KanbanBoard, TaskDto, TaskStatus};
use uuid::Uuid;

/// Lifecycle of one optimistic mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    /// Applied locally, server response still outstanding
    PendingOptimistic,
    /// Server confirmed; the local prediction stands
    Confirmed,
    /// Server rejected or the transport failed; local state was
    /// discarded and replaced by a fresh server snapshot
    Reverted,
}

/// Marker for one optimistic status move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveMutation {
    pub task_id: Uuid,
    pub from: TaskStatus,
    pub to: TaskStatus,
    pub state: MutationState,
}

/// Client-side cache of the kanban projection
#[derive(Debug, Default)]
pub struct BoardCache {
    board: KanbanBoard,
}

impl BoardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current board view
    pub fn board(&self) -> &KanbanBoard {
        &self.board
    }

    /// Overwrite the whole cache with a server snapshot, unconditionally
    ///
    /// This is the sole recovery path: there is no field-level
    /// reconciliation.
    pub fn replace(&mut self, snapshot: KanbanBoard) {
        self.board = snapshot;
    }

    /// Locate a task and the bucket it currently sits in
    pub fn find(&self, task_id: Uuid) -> Option<(TaskStatus, &TaskDto)> {
        for status in TaskStatus::ALL {
            if let Some(task) = self.board.bucket(status).iter().find(|t| t.id == task_id) {
                return Some((status, task));
            }
        }
        None
    }

    /// Append a server-confirmed task to the bucket of its status
    ///
    /// Creation is never optimistic: the server assigns the identity, so
    /// the record enters the cache only after the request succeeds.
    pub fn insert_confirmed(&mut self, task: TaskDto) {
        self.board.bucket_mut(task.status).push(task);
    }

    /// Apply an optimistic status move: out of the source bucket, into
    /// the destination bucket, before the network round trip completes
    ///
    /// Returns the pending mutation marker, or `None` when the task is
    /// not in the cache.
    pub fn begin_move(&mut self, task_id: Uuid, to: TaskStatus) -> Option<MoveMutation> {
        let (from, _) = self.find(task_id)?;

        let source = self.board.bucket_mut(from);
        let position = source.iter().position(|t| t.id == task_id)?;
        let mut task = source.remove(position);
        task.status = to;
        self.board.bucket_mut(to).push(task);

        Some(MoveMutation {
            task_id,
            from,
            to,
            state: MutationState::PendingOptimistic,
        })
    }

    /// Settle a move on server success: the prediction already matches,
    /// so the cache is untouched
    pub fn confirm(&self, mutation: &mut MoveMutation) {
        debug_assert_eq!(mutation.state, MutationState::PendingOptimistic);
        mutation.state = MutationState::Confirmed;
    }

    /// Settle a move on failure: discard the optimistic state and
    /// overwrite with the snapshot fetched from the server
    pub fn revert(&mut self, mutation: &mut MoveMutation, snapshot: KanbanBoard) {
        debug_assert_eq!(mutation.state, MutationState::PendingOptimistic);
        mutation.state = MutationState::Reverted;
        self.replace(snapshot);
    }

    /// Settle a move on failure when no snapshot could be fetched: undo
    /// the optimistic move in place using the mutation's own bookkeeping
    ///
    /// This is the fallback for the double failure (the move was rejected
    /// and the recovery refetch failed too); the board may be stale, but
    /// no mutation is left unsettled and the bucket partition holds.
    pub fn rollback(&mut self, mutation: &mut MoveMutation) {
        debug_assert_eq!(mutation.state, MutationState::PendingOptimistic);
        mutation.state = MutationState::Reverted;

        let destination = self.board.bucket_mut(mutation.to);
        if let Some(position) = destination.iter().position(|t| t.id == mutation.task_id) {
            let mut task = destination.remove(position);
            task.status = mutation.from;
            self.board.bucket_mut(mutation.from).push(task);
        }
    }

    /// Apply a server-confirmed full update
    ///
    /// Moves the record between buckets when the status changed,
    /// otherwise replaces it in place.
    pub fn apply_update(&mut self, task: TaskDto) {
        let Some((current, _)) = self.find(task.id) else {
            // Not cached (e.g. created in another view); treat as insert
            self.insert_confirmed(task);
            return;
        };

        if current == task.status {
            let bucket = self.board.bucket_mut(current);
            if let Some(slot) = bucket.iter_mut().find(|t| t.id == task.id) {
                *slot = task;
            }
        } else {
            let bucket = self.board.bucket_mut(current);
            bucket.retain(|t| t.id != task.id);
            self.board.bucket_mut(task.status).push(task);
        }
    }

    /// Remove a task after the server confirmed its deletion
    pub fn remove_confirmed(&mut self, task_id: Uuid) {
        for status in TaskStatus::ALL {
            self.board.bucket_mut(status).retain(|t| t.id != task_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::collections::HashSet;

    fn task(status: TaskStatus) -> TaskDto {
        let now = Utc::now();
        TaskDto {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: String::new(),
            status,
            due_date: now + Duration::days(1),
            user: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            is_overdue: false,
        }
    }

    /// Buckets must be a disjoint exhaustive cover: every task in exactly
    /// one bucket, and every bucket holding only its own status
    fn assert_partition(cache: &BoardCache, expected_total: usize) {
        let board = cache.board();
        let mut seen = HashSet::new();
        for status in TaskStatus::ALL {
            for t in board.bucket(status) {
                assert_eq!(t.status, status, "task in wrong bucket");
                assert!(seen.insert(t.id), "task {} in two buckets", t.id);
            }
        }
        assert_eq!(seen.len(), expected_total);
    }

    #[test]
    fn create_is_not_optimistic() {
        let mut cache = BoardCache::new();
        let confirmed = task(TaskStatus::Pending);

        // Nothing enters the cache until the server has confirmed
        assert!(cache.find(confirmed.id).is_none());

        cache.insert_confirmed(confirmed.clone());
        assert_eq!(cache.find(confirmed.id).unwrap().0, TaskStatus::Pending);
        assert_partition(&cache, 1);
    }

    #[test]
    fn optimistic_move_applies_before_settlement() {
        let mut cache = BoardCache::new();
        let t = task(TaskStatus::Pending);
        cache.insert_confirmed(t.clone());

        let mutation = cache.begin_move(t.id, TaskStatus::InProgress).unwrap();

        assert_eq!(mutation.state, MutationState::PendingOptimistic);
        assert_eq!(mutation.from, TaskStatus::Pending);
        assert_eq!(mutation.to, TaskStatus::InProgress);

        // Already moved locally, even though nothing is settled yet
        assert_eq!(cache.find(t.id).unwrap().0, TaskStatus::InProgress);
        assert!(cache.board().pending.is_empty());
        assert_partition(&cache, 1);
    }

    #[test]
    fn confirm_leaves_the_prediction_in_place() {
        let mut cache = BoardCache::new();
        let t = task(TaskStatus::Pending);
        cache.insert_confirmed(t.clone());

        let mut mutation = cache.begin_move(t.id, TaskStatus::Completed).unwrap();
        cache.confirm(&mut mutation);

        assert_eq!(mutation.state, MutationState::Confirmed);
        assert_eq!(cache.find(t.id).unwrap().0, TaskStatus::Completed);
        assert_partition(&cache, 1);
    }

    #[test]
    fn revert_discards_prediction_and_takes_the_snapshot() {
        let mut cache = BoardCache::new();
        let t = task(TaskStatus::Pending);
        cache.insert_confirmed(t.clone());

        let mut mutation = cache.begin_move(t.id, TaskStatus::Completed).unwrap();

        // Server rejected the move; the authoritative snapshot still has
        // the task pending
        let mut snapshot = KanbanBoard::default();
        snapshot.pending.push(t.clone());
        cache.revert(&mut mutation, snapshot);

        assert_eq!(mutation.state, MutationState::Reverted);
        assert_eq!(cache.find(t.id).unwrap().0, TaskStatus::Pending);
        assert!(cache.board().completed.is_empty());
        assert_partition(&cache, 1);
    }

    #[test]
    fn rollback_undoes_the_move_without_a_snapshot() {
        let mut cache = BoardCache::new();
        let other = task(TaskStatus::Pending);
        let t = task(TaskStatus::Pending);
        cache.insert_confirmed(other.clone());
        cache.insert_confirmed(t.clone());

        let mut mutation = cache.begin_move(t.id, TaskStatus::Completed).unwrap();

        // The move was rejected and the recovery refetch failed too; the
        // mutation must still settle, with the card back in its column.
        cache.rollback(&mut mutation);

        assert_eq!(mutation.state, MutationState::Reverted);
        assert_eq!(cache.find(t.id).unwrap().0, TaskStatus::Pending);
        assert!(cache.board().completed.is_empty());
        // The untouched neighbor is unaffected
        assert_eq!(cache.find(other.id).unwrap().0, TaskStatus::Pending);
        assert_partition(&cache, 2);
    }

    #[test]
    fn move_of_unknown_task_is_rejected() {
        let mut cache = BoardCache::new();
        assert!(cache.begin_move(Uuid::new_v4(), TaskStatus::Pending).is_none());
    }

    #[test]
    fn update_with_status_change_moves_buckets() {
        let mut cache = BoardCache::new();
        let mut t = task(TaskStatus::Pending);
        cache.insert_confirmed(t.clone());

        t.status = TaskStatus::InProgress;
        t.title = "renamed".to_string();
        cache.apply_update(t.clone());

        let (bucket, cached) = cache.find(t.id).unwrap();
        assert_eq!(bucket, TaskStatus::InProgress);
        assert_eq!(cached.title, "renamed");
        assert_partition(&cache, 1);
    }

    #[test]
    fn update_without_status_change_replaces_in_place() {
        let mut cache = BoardCache::new();
        let other = task(TaskStatus::Pending);
        let mut t = task(TaskStatus::Pending);
        cache.insert_confirmed(other.clone());
        cache.insert_confirmed(t.clone());

        t.title = "renamed".to_string();
        cache.apply_update(t.clone());

        assert_eq!(cache.board().pending.len(), 2);
        // Position preserved: the other task is still first
        assert_eq!(cache.board().pending[0].id, other.id);
        assert_eq!(cache.board().pending[1].title, "renamed");
        assert_partition(&cache, 2);
    }

    #[test]
    fn delete_removes_after_confirmation_only() {
        let mut cache = BoardCache::new();
        let t = task(TaskStatus::Completed);
        cache.insert_confirmed(t.clone());

        cache.remove_confirmed(t.id);
        assert!(cache.find(t.id).is_none());
        assert_partition(&cache, 0);
    }

    #[test]
    fn replace_overwrites_unconditionally() {
        let mut cache = BoardCache::new();
        cache.insert_confirmed(task(TaskStatus::Pending));
        cache.insert_confirmed(task(TaskStatus::Completed));

        let mut snapshot = KanbanBoard::default();
        let fresh = task(TaskStatus::InProgress);
        snapshot.in_progress.push(fresh.clone());
        cache.replace(snapshot);

        assert_eq!(cache.board().len(), 1);
        assert_eq!(cache.find(fresh.id).unwrap().0, TaskStatus::InProgress);
        assert_partition(&cache, 1);
    }

    #[test]
    fn moves_on_distinct_tasks_can_be_in_flight_together() {
        let mut cache = BoardCache::new();
        let a = task(TaskStatus::Pending);
        let b = task(TaskStatus::Pending);
        cache.insert_confirmed(a.clone());
        cache.insert_confirmed(b.clone());

        let mut move_a = cache.begin_move(a.id, TaskStatus::InProgress).unwrap();
        let mut move_b = cache.begin_move(b.id, TaskStatus::Completed).unwrap();

        cache.confirm(&mut move_a);
        cache.confirm(&mut move_b);

        assert_eq!(cache.find(a.id).unwrap().0, TaskStatus::InProgress);
        assert_eq!(cache.find(b.id).unwrap().0, TaskStatus::Completed);
        assert_partition(&cache, 2);
    }
}
