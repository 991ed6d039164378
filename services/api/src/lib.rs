//! Taskdeck API service
//!
//! An authenticated REST API for a per-user task tracker: registration and
//! login issue stateless bearer tokens, every task operation is scoped to
//! the requesting owner, and the kanban endpoint serves the board's
//! three-column projection.

use anyhow::Result;
use common::store::Collection;

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod validation;

use crate::config::AppConfig;
use crate::jwt::JwtService;
use crate::repositories::{TaskRepository, UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub task_repository: TaskRepository,
}

impl AppState {
    /// Wire up the store collections, repositories and JWT service
    pub fn new(config: &AppConfig) -> Result<Self> {
        let jwt_service = JwtService::new(&config.jwt);
        let user_repository = UserRepository::new(Collection::new("users"), config.hash)?;
        let task_repository = TaskRepository::new(Collection::new("tasks"));

        Ok(Self {
            jwt_service,
            user_repository,
            task_repository,
        })
    }
}
