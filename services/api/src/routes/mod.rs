//! API service routes

pub mod auth;
pub mod tasks;
pub mod users;

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, patch, post, put},
};
use serde_json::json;

use crate::AppState;
use crate::middleware::auth_middleware;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route(
            "/users/profile",
            get(users::get_profile)
                .put(users::update_profile)
                .delete(users::delete_account),
        )
        .route("/users/password", put(users::change_password))
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/tasks/kanban", get(tasks::kanban))
        .route(
            "/tasks/:id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/tasks/:id/status", patch(tasks::update_status))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let public = Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    Router::new()
        .route("/", get(root))
        .nest("/api", public.merge(protected))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "API is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Root endpoint: service banner
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Taskdeck API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
