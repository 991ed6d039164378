//! Task repository: the owner-scoped task store and lifecycle engine
//!
//! Every operation takes the requester's identity and scopes by it; an
//! unscoped listing is never exposed. A task that exists but belongs to a
//! different owner is reported as absent, indistinguishable from a task
//! that does not exist.

use chrono::Utc;
use common::store::Collection;
use common::types::{KanbanBoard, TaskStatus};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::{NewTask, Task, TaskPatch};

/// Sortable task fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    DueDate,
}

/// List options: status filter and sort order
///
/// The wire form of the sort key follows the original API: a field name
/// with an optional leading `-` for descending, e.g. `-created_at`.
#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    pub status: Option<TaskStatus>,
    pub sort_field: SortField,
    pub descending: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            status: None,
            sort_field: SortField::CreatedAt,
            descending: true,
        }
    }
}

impl ListOptions {
    /// Parse a sort key like `due_date` or `-created_at`
    pub fn parse_sort(key: &str) -> Option<(SortField, bool)> {
        let (field, descending) = match key.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (key, false),
        };
        match field {
            "created_at" => Some((SortField::CreatedAt, descending)),
            "due_date" => Some((SortField::DueDate, descending)),
            _ => None,
        }
    }
}

/// Task repository
#[derive(Clone)]
pub struct TaskRepository {
    tasks: Collection<Task>,
}

impl TaskRepository {
    /// Create a new task repository over the given collection
    pub fn new(tasks: Collection<Task>) -> Self {
        Self { tasks }
    }

    /// List the owner's tasks with optional status filter and sort
    pub async fn list(&self, owner: Uuid, options: ListOptions) -> ApiResult<Vec<Task>> {
        let mut tasks = self.tasks.scan(|t| {
            t.user == owner && options.status.is_none_or(|status| t.status == status)
        })?;

        match options.sort_field {
            SortField::CreatedAt => tasks.sort_by_key(|t| t.created_at),
            SortField::DueDate => tasks.sort_by_key(|t| t.due_date),
        }
        if options.descending {
            tasks.reverse();
        }

        Ok(tasks)
    }

    /// Fetch a single task, scoped to the owner
    pub async fn get(&self, owner: Uuid, id: Uuid) -> ApiResult<Option<Task>> {
        Ok(self.tasks.get(id)?.filter(|t| t.user == owner))
    }

    /// Create a task owned by the requester
    pub async fn create(&self, owner: Uuid, new_task: NewTask) -> ApiResult<Task> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: new_task.title,
            description: new_task.description,
            status: new_task.status,
            due_date: new_task.due_date,
            user: owner,
            created_at: now,
            updated_at: now,
        };

        self.tasks.insert(task.id, task.clone())?;
        info!("Created task {} for user {}", task.id, owner);
        Ok(task)
    }

    /// Apply a partial update to an owned task
    ///
    /// Absent fields are untouched; present fields are applied. The owner
    /// field is never written. Returns `None` when the task does not exist
    /// or is not owned by the requester.
    pub async fn update(&self, owner: Uuid, id: Uuid, patch: TaskPatch) -> ApiResult<Option<Task>> {
        let updated = self.tasks.update(id, |task| {
            if task.user != owner {
                return;
            }
            if let Some(title) = patch.title {
                task.title = title;
            }
            if let Some(description) = patch.description {
                task.description = description;
            }
            if let Some(status) = patch.status {
                task.status = status;
            }
            if let Some(due_date) = patch.due_date {
                task.due_date = due_date;
            }
            task.updated_at = Utc::now();
        })?;

        Ok(updated.filter(|t| t.user == owner))
    }

    /// Transition an owned task to a new status
    ///
    /// The status graph is fully connected: any status is reachable from
    /// any other in one step. Returns `None` when the task does not exist
    /// or is not owned by the requester.
    pub async fn set_status(
        &self,
        owner: Uuid,
        id: Uuid,
        status: TaskStatus,
    ) -> ApiResult<Option<Task>> {
        let updated = self.tasks.update(id, |task| {
            if task.user != owner {
                return;
            }
            task.status = status;
            task.updated_at = Utc::now();
        })?;

        Ok(updated.filter(|t| t.user == owner))
    }

    /// Delete an owned task; false when not found or not owned
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> ApiResult<bool> {
        let removed = self.tasks.remove_where(|t| t.id == id && t.user == owner)?;
        Ok(removed > 0)
    }

    /// The kanban projection: every owned task, partitioned by status
    ///
    /// Buckets are ordered by creation time descending and together hold
    /// exactly the same records as an unfiltered `list`.
    pub async fn kanban(&self, owner: Uuid) -> ApiResult<KanbanBoard> {
        let tasks = self.list(owner, ListOptions::default()).await?;

        let mut board = KanbanBoard::default();
        for task in &tasks {
            board.bucket_mut(task.status).push(task.to_dto());
        }

        Ok(board)
    }

    /// Delete every task owned by the given user, returning the count
    ///
    /// One half of account deletion; runs before the user record is
    /// removed so no orphaned tasks survive.
    pub async fn delete_all_for_owner(&self, owner: Uuid) -> ApiResult<usize> {
        let removed = self.tasks.remove_where(|t| t.user == owner)?;
        info!("Deleted {} tasks for user {}", removed, owner);
        Ok(removed)
    }
}
