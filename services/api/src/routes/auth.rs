//! Authentication routes: registration, login, logout, current identity

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use common::types::{Envelope, FieldError};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::NewUser;
use crate::validation::{validate_email, validate_name, validate_password};

/// Request for user registration
#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Register a new user and issue a token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = Vec::new();
    if let Err(message) = validate_name(&payload.name) {
        errors.push(FieldError::new("name", message));
    }
    if let Err(message) = validate_email(&payload.email) {
        errors.push(FieldError::new("email", message));
    }
    if let Err(message) = validate_password(&payload.password) {
        errors.push(FieldError::new("password", message));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let user = state
        .user_repository
        .create(&NewUser {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    let token = state.jwt_service.issue(user.id, &user.email).map_err(|e| {
        tracing::error!("Failed to issue token: {}", e);
        ApiError::Internal
    })?;

    info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(Envelope::<Value>::ok_with_message(
            "User registered successfully",
            json!({ "user": user.to_dto(), "token": token }),
        )),
    ))
}

/// Verify credentials and issue a token
///
/// The failure message never reveals whether the email or the password
/// was wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await?
        .ok_or(ApiError::Unauthorized("Invalid email or password"))?;

    let verified = state
        .user_repository
        .verify_password(&user, &payload.password)
        .await?;
    if !verified {
        warn!("Failed login attempt for user {}", user.id);
        return Err(ApiError::Unauthorized("Invalid email or password"));
    }

    let token = state.jwt_service.issue(user.id, &user.email).map_err(|e| {
        tracing::error!("Failed to issue token: {}", e);
        ApiError::Internal
    })?;

    Ok((
        StatusCode::OK,
        Json(Envelope::<Value>::ok_with_message(
            "Login successful",
            json!({ "user": user.to_dto(), "token": token }),
        )),
    ))
}

/// Acknowledge logout
///
/// Tokens are stateless and not revocable; the client discards its copy.
pub async fn logout(Extension(user): Extension<AuthUser>) -> impl IntoResponse {
    info!("Logout acknowledged for user {}", user.id);
    Json(Envelope::message("Logged out successfully"))
}

/// Current identity, as resolved from the token
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_id(auth.id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(Envelope::<Value>::ok(
        json!({ "user": user.to_dto() }),
    )))
}
