//! Repositories over the document store

pub mod task;
pub mod user;

// Re-export for convenience
pub use task::{ListOptions, SortField, TaskRepository};
pub use user::UserRepository;
