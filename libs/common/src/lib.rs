//! Common library for the Taskdeck application
//!
//! This crate provides the pieces shared between the API service and the
//! board client: the wire-level types (task/user representations, the
//! kanban projection, the response envelope) and the document store that
//! backs the service's repositories.

pub mod error;
pub mod store;
pub mod types;
