//! Typed HTTP client for the taskdeck REST API
//!
//! Thin wrappers over every route, attaching the bearer token and
//! unwrapping the response envelope. All state beyond the token lives in
//! [`crate::cache::BoardCache`].

use chrono::{DateTime, Utc};
use common::types::{Envelope, KanbanBoard, TaskDto, TaskStatus, UserDto};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::error::BoardError;

/// A new task to submit
#[derive(Debug, Clone, Serialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    pub due_date: DateTime<Utc>,
}

/// A partial task update; absent fields stay untouched on the server
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// A user identity plus the token the server issued for it
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserDto,
    pub token: String,
}

#[derive(serde::Deserialize)]
struct AuthData {
    user: UserDto,
    token: String,
}

#[derive(serde::Deserialize)]
struct UserData {
    user: UserDto,
}

#[derive(serde::Deserialize)]
struct TaskData {
    task: TaskDto,
}

#[derive(serde::Deserialize)]
struct TasksData {
    tasks: Vec<TaskDto>,
}

#[derive(serde::Deserialize)]
struct KanbanData {
    kanban: KanbanBoard,
}

#[derive(serde::Deserialize)]
struct TokenData {
    token: String,
}

/// HTTP client for the taskdeck API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client against the given base URL, e.g.
    /// `http://localhost:5000/api`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// The token currently attached to protected requests, if any
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Attach a bearer token for subsequent protected requests
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Discard the token; logout is purely a client-side discard
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
    }

    fn protected(&self, method: Method, path: &str) -> Result<RequestBuilder, BoardError> {
        let token = self.token.as_ref().ok_or(BoardError::Unauthenticated)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    async fn unwrap_data<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BoardError> {
        let status = response.status();
        if !status.is_success() {
            let envelope: Envelope<serde_json::Value> = response.json().await.unwrap_or(Envelope {
                success: false,
                message: None,
                data: None,
                errors: None,
            });
            return Err(BoardError::Api {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "Request failed".to_string()),
            });
        }

        let envelope: Envelope<T> = response.json().await?;
        envelope
            .data
            .ok_or_else(|| BoardError::Protocol("missing data in success envelope".to_string()))
    }

    async fn expect_success(response: reqwest::Response) -> Result<(), BoardError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let envelope: Envelope<serde_json::Value> = response.json().await.unwrap_or(Envelope {
            success: false,
            message: None,
            data: None,
            errors: None,
        });
        Err(BoardError::Api {
            status: status.as_u16(),
            message: envelope
                .message
                .unwrap_or_else(|| "Request failed".to_string()),
        })
    }

    /// Register a new account; the returned token is attached to the
    /// client for subsequent calls
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BoardError> {
        let response = self
            .request(Method::POST, "/auth/register")
            .json(&serde_json::json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?;
        let data: AuthData = Self::unwrap_data(response).await?;
        self.set_token(&data.token);
        Ok(AuthSession {
            user: data.user,
            token: data.token,
        })
    }

    /// Log in with existing credentials
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthSession, BoardError> {
        let response = self
            .request(Method::POST, "/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let data: AuthData = Self::unwrap_data(response).await?;
        self.set_token(&data.token);
        Ok(AuthSession {
            user: data.user,
            token: data.token,
        })
    }

    /// Acknowledge logout server-side, then drop the token locally
    pub async fn logout(&mut self) -> Result<(), BoardError> {
        let response = self.protected(Method::POST, "/auth/logout")?.send().await?;
        Self::expect_success(response).await?;
        self.clear_token();
        Ok(())
    }

    /// The identity behind the current token
    pub async fn me(&self) -> Result<UserDto, BoardError> {
        let response = self.protected(Method::GET, "/auth/me")?.send().await?;
        let data: UserData = Self::unwrap_data(response).await?;
        Ok(data.user)
    }

    /// Fetch the profile of the current user
    pub async fn profile(&self) -> Result<UserDto, BoardError> {
        let response = self.protected(Method::GET, "/users/profile")?.send().await?;
        let data: UserData = Self::unwrap_data(response).await?;
        Ok(data.user)
    }

    /// Update name, email, or avatar
    pub async fn update_profile(
        &self,
        name: Option<&str>,
        email: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<UserDto, BoardError> {
        let response = self
            .protected(Method::PUT, "/users/profile")?
            .json(&serde_json::json!({ "name": name, "email": email, "avatar": avatar }))
            .send()
            .await?;
        let data: UserData = Self::unwrap_data(response).await?;
        Ok(data.user)
    }

    /// Change the password; the fresh token replaces the current one
    pub async fn change_password(
        &mut self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), BoardError> {
        let response = self
            .protected(Method::PUT, "/users/password")?
            .json(&serde_json::json!({
                "currentPassword": current_password,
                "newPassword": new_password,
            }))
            .send()
            .await?;
        let data: TokenData = Self::unwrap_data(response).await?;
        self.set_token(data.token);
        Ok(())
    }

    /// Delete the account and everything it owns
    pub async fn delete_account(&mut self) -> Result<(), BoardError> {
        let response = self
            .protected(Method::DELETE, "/users/profile")?
            .send()
            .await?;
        Self::expect_success(response).await?;
        self.clear_token();
        Ok(())
    }

    /// List tasks, optionally filtered by status
    pub async fn list_tasks(&self, status: Option<TaskStatus>) -> Result<Vec<TaskDto>, BoardError> {
        let path = match status {
            Some(status) => format!("/tasks?status={}", status),
            None => "/tasks".to_string(),
        };
        let response = self.protected(Method::GET, &path)?.send().await?;
        let data: TasksData = Self::unwrap_data(response).await?;
        Ok(data.tasks)
    }

    /// Fetch the full kanban projection
    pub async fn fetch_kanban(&self) -> Result<KanbanBoard, BoardError> {
        let response = self.protected(Method::GET, "/tasks/kanban")?.send().await?;
        let data: KanbanData = Self::unwrap_data(response).await?;
        Ok(data.kanban)
    }

    /// Fetch a single task
    pub async fn get_task(&self, id: Uuid) -> Result<TaskDto, BoardError> {
        let response = self
            .protected(Method::GET, &format!("/tasks/{}", id))?
            .send()
            .await?;
        let data: TaskData = Self::unwrap_data(response).await?;
        Ok(data.task)
    }

    /// Create a task
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<TaskDto, BoardError> {
        let response = self
            .protected(Method::POST, "/tasks")?
            .json(draft)
            .send()
            .await?;
        let data: TaskData = Self::unwrap_data(response).await?;
        Ok(data.task)
    }

    /// Apply a partial update to a task
    pub async fn update_task(&self, id: Uuid, update: &TaskUpdate) -> Result<TaskDto, BoardError> {
        let response = self
            .protected(Method::PUT, &format!("/tasks/{}", id))?
            .json(update)
            .send()
            .await?;
        let data: TaskData = Self::unwrap_data(response).await?;
        Ok(data.task)
    }

    /// Status-only transition, the drag-and-drop request
    pub async fn update_status(
        &self,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<TaskDto, BoardError> {
        let response = self
            .protected(Method::PATCH, &format!("/tasks/{}/status", id))?
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await?;
        let data: TaskData = Self::unwrap_data(response).await?;
        Ok(data.task)
    }

    /// Delete a task
    pub async fn delete_task(&self, id: Uuid) -> Result<(), BoardError> {
        let response = self
            .protected(Method::DELETE, &format!("/tasks/{}", id))?
            .send()
            .await?;
        Self::expect_success(response).await
    }

    /// Probe the public health endpoint
    pub async fn health(&self) -> Result<StatusCode, BoardError> {
        let response = self.request(Method::GET, "/health").send().await?;
        Ok(response.status())
    }
}
