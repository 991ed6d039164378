//! Taskdeck board client
//!
//! The client side of the task tracker: a typed HTTP client for the REST
//! API and a three-bucket board cache that mirrors the server's kanban
//! projection. Status moves are applied optimistically so the board stays
//! latency-free; any failure reverts by refetching the full projection.

pub mod api;
pub mod board;
pub mod cache;
pub mod error;

pub use api::{ApiClient, AuthSession, TaskDraft, TaskUpdate};
pub use board::Board;
pub use cache::{BoardCache, MoveMutation, MutationState};
pub use error::BoardError;
