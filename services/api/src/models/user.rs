//! User model and related functionality

use chrono::{DateTime, Utc};
use common::types::UserDto;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User record as held by the credential store
///
/// The email is stored lowercase so uniqueness is case-insensitive. The
/// password hash never leaves this type: outward serialization goes
/// through [`UserDto`], which has no hash field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Outward representation, without the password hash
    pub fn to_dto(&self) -> UserDto {
        UserDto {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
            created_at: self.created_at,
        }
    }
}

/// New user creation payload
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Partial profile update
///
/// `None` means the field is untouched; `Some` applies the value, and an
/// empty avatar string clears the avatar.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}
