//! Wire-level types shared between the API service and the board client
//!
//! Everything here crosses the HTTP boundary as JSON: the task status
//! enumeration, the outward task and user representations, the kanban
//! projection, and the response envelope every endpoint wraps its payload
//! in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task status
///
/// The three columns of the board. No other value is ever persisted or
/// returned; inbound strings are parsed with [`TaskStatus::parse`] so an
/// unknown value can be rejected as a field-level validation error before
/// any lookup happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// All statuses, in board-column order
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Parse a status from its wire representation
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(TaskStatus::Pending),
            "in-progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    /// Wire representation of this status
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outward representation of a task
///
/// `is_overdue` is recomputed on every read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: DateTime<Utc>,
    pub user: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "isOverdue")]
    pub is_overdue: bool,
}

/// Outward representation of a user
///
/// Deliberately a separate type from the stored record: the password hash
/// has no field here, so it cannot leak through serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

/// The kanban projection: every task of one owner, partitioned by status
///
/// The union of the three buckets is exactly the owner's unfiltered task
/// list; within each bucket tasks are ordered by creation time descending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KanbanBoard {
    pub pending: Vec<TaskDto>,
    #[serde(rename = "in-progress")]
    pub in_progress: Vec<TaskDto>,
    pub completed: Vec<TaskDto>,
}

impl KanbanBoard {
    /// Iterate over every task across all three buckets
    pub fn iter(&self) -> impl Iterator<Item = &TaskDto> {
        self.pending
            .iter()
            .chain(self.in_progress.iter())
            .chain(self.completed.iter())
    }

    /// Total number of tasks on the board
    pub fn len(&self) -> usize {
        self.pending.len() + self.in_progress.len() + self.completed.len()
    }

    /// Whether the board holds no tasks
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The bucket for the given status
    pub fn bucket(&self, status: TaskStatus) -> &Vec<TaskDto> {
        match status {
            TaskStatus::Pending => &self.pending,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Completed => &self.completed,
        }
    }

    /// Mutable bucket for the given status
    pub fn bucket_mut(&mut self, status: TaskStatus) -> &mut Vec<TaskDto> {
        match status {
            TaskStatus::Pending => &mut self.pending,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Completed => &mut self.completed,
        }
    }
}

/// A field-level validation failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The response envelope every endpoint returns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> Envelope<T> {
    /// A successful envelope carrying a payload
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            errors: None,
        }
    }

    /// A successful envelope with a human-readable message
    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            errors: None,
        }
    }
}

impl Envelope<()> {
    /// A successful envelope with a message and no payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            errors: None,
        }
    }

    /// A failure envelope
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            errors: None,
        }
    }

    /// A failure envelope carrying field-level detail
    pub fn validation(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            errors: Some(errors),
        }
    }
}
