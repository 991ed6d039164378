//! User profile routes: fetch, update, password change, account deletion

use axum::{Extension, Json, extract::State, response::IntoResponse};
use common::types::{Envelope, FieldError};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::ProfilePatch;
use crate::validation::{validate_avatar, validate_email, validate_name, validate_password};

/// Request for a profile update; absent fields are untouched
#[derive(Deserialize, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

/// Request for a password change
#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "currentPassword", default)]
    pub current_password: String,
    #[serde(rename = "newPassword", default)]
    pub new_password: String,
}

/// Fetch the requester's profile
pub async fn get_profile(
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

/// Apply a partial profile update
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = Vec::new();
    if let Some(name) = &payload.name {
        if let Err(message) = validate_name(name) {
            errors.push(FieldError::new("name", message));
        }
    }
    if let Some(email) = &payload.email {
        if let Err(message) = validate_email(email) {
            errors.push(FieldError::new("email", message));
        }
    }
    if let Some(avatar) = &payload.avatar {
        if let Err(message) = validate_avatar(avatar) {
            errors.push(FieldError::new("avatar", message));
        }
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let patch = ProfilePatch {
        name: payload.name,
        email: payload.email,
        avatar: payload.avatar,
    };

    let user = state
        .user_repository
        .update_profile(auth.id, &patch)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(Envelope::<Value>::ok_with_message(
        "Profile updated successfully",
        json!({ "user": user.to_dto() }),
    )))
}

/// Change the requester's password and issue a fresh token
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    if let Err(message) = validate_password(&payload.new_password) {
        return Err(ApiError::field("newPassword", message));
    }

    let user = state
        .user_repository
        .find_by_id(auth.id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    let verified = state
        .user_repository
        .verify_password(&user, &payload.current_password)
        .await?;
    if !verified {
        return Err(ApiError::field(
            "currentPassword",
            "Current password is incorrect",
        ));
    }

    let user = state
        .user_repository
        .update_password(auth.id, &payload.new_password)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    let token = state.jwt_service.issue(user.id, &user.email).map_err(|e| {
        tracing::error!("Failed to issue token: {}", e);
        ApiError::Internal
    })?;

    info!("Password changed for user {}", user.id);

    Ok(Json(Envelope::<Value>::ok_with_message(
        "Password changed successfully",
        json!({ "token": token }),
    )))
}

/// Delete the requester's account and every task it owns
///
/// An explicit ordered two-step: tasks first, then the user record, so
/// no orphaned tasks can survive the user.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let removed_tasks = state.task_repository.delete_all_for_owner(auth.id).await?;

    let removed = state.user_repository.delete(auth.id).await?;
    if !removed {
        return Err(ApiError::NotFound("User not found"));
    }

    info!(
        "Deleted account {} and {} owned tasks",
        auth.id, removed_tasks
    );

    Ok(Json(Envelope::message("Account deleted successfully")))
}
