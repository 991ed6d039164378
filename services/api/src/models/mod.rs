//! API service models

pub mod task;
pub mod user;

// Re-export for convenience
pub use task::{NewTask, Task, TaskPatch};
pub use user::{NewUser, ProfilePatch, User};
