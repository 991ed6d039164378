//! Task model and related functionality

use chrono::{DateTime, Utc};
use common::types::{TaskDto, TaskStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task record as held by the task store
///
/// The `user` field is the owner, set once at creation and immutable
/// thereafter; no update path writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: DateTime<Utc>,
    pub user: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Whether the task is overdue relative to `now`
    ///
    /// Recomputed on every read, never stored.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now && self.status != TaskStatus::Completed
    }

    /// Outward representation with the computed overdue flag
    pub fn to_dto(&self) -> TaskDto {
        TaskDto {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            due_date: self.due_date,
            user: self.user,
            created_at: self.created_at,
            updated_at: self.updated_at,
            is_overdue: self.is_overdue(Utc::now()),
        }
    }
}

/// New task creation payload (already validated)
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: DateTime<Utc>,
}

/// Partial task update (already validated)
///
/// Absent fields are untouched; present fields are applied, including a
/// description explicitly set to the empty string. The owner is not a
/// member: ownership cannot change through an update.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn task(status: TaskStatus, due_in_hours: i64) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: String::new(),
            status,
            due_date: now + Duration::hours(due_in_hours),
            user: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn overdue_requires_past_due_date_and_incomplete_status() {
        let now = Utc::now();
        assert!(task(TaskStatus::Pending, -1).is_overdue(now));
        assert!(task(TaskStatus::InProgress, -1).is_overdue(now));
        assert!(!task(TaskStatus::Completed, -1).is_overdue(now));
        assert!(!task(TaskStatus::Pending, 1).is_overdue(now));
    }
}
