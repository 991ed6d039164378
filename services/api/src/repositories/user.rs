//! User repository: the credential store
//!
//! Owns user identity records and the password hashing policy. Hashing is
//! deliberately expensive (Argon2id with a configurable work factor) and
//! always runs on the registration and password-change path; it is never
//! cached or skipped.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use chrono::Utc;
use common::store::{Collection, UpdateOutcome};
use tracing::info;
use uuid::Uuid;

use crate::config::HashConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::{NewUser, ProfilePatch, User};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    users: Collection<User>,
    hasher: Argon2<'static>,
}

impl UserRepository {
    /// Create a new user repository over the given collection
    pub fn new(users: Collection<User>, hash_config: HashConfig) -> ApiResult<Self> {
        let params = Params::new(
            hash_config.memory_kib,
            hash_config.iterations,
            hash_config.parallelism,
            None,
        )
        .map_err(|e| {
            tracing::error!("Invalid password hashing parameters: {}", e);
            ApiError::Internal
        })?;
        let hasher = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        Ok(Self { users, hasher })
    }

    fn hash_password(&self, password: &str) -> ApiResult<String> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = self
            .hasher
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {}", e);
                ApiError::Internal
            })?
            .to_string();
        Ok(hash)
    }

    /// Create a new user
    ///
    /// Fails with `Conflict` when the email is already registered
    /// (case-insensitively). Uniqueness is enforced at insert time under
    /// the collection's write lock, so two racing registrations for the
    /// same address cannot both succeed; the pre-check only spares the
    /// loser the cost of hashing.
    pub async fn create(&self, new_user: &NewUser) -> ApiResult<User> {
        let email = new_user.email.trim().to_lowercase();

        if self.find_by_email(&email).await?.is_some() {
            return Err(ApiError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = self.hash_password(&new_user.password)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name.trim().to_string(),
            email,
            password_hash,
            avatar: String::new(),
            created_at: now,
            updated_at: now,
        };

        let inserted = self
            .users
            .insert_unique(user.id, user.clone(), |u| u.email == user.email)?;
        if !inserted {
            return Err(ApiError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }
        info!("Created user {}", user.id);
        Ok(user)
    }

    /// Find a user by email, case-insensitively
    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let needle = email.trim().to_lowercase();
        Ok(self.users.find_one(|u| u.email == needle)?)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<User>> {
        Ok(self.users.get(id)?)
    }

    /// Verify a user's password against the stored hash
    pub async fn verify_password(&self, user: &User, password: &str) -> ApiResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
            tracing::error!("Failed to parse password hash: {}", e);
            ApiError::Internal
        })?;

        Ok(self
            .hasher
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Apply a partial profile update
    ///
    /// When the email changes, uniqueness is re-checked and the record
    /// mutated under one write lock; another user claiming the address
    /// concurrently yields a `Conflict` for exactly one of the two.
    /// Returns `None` when the user no longer exists.
    pub async fn update_profile(&self, id: Uuid, patch: &ProfilePatch) -> ApiResult<Option<User>> {
        let email = patch.email.as_ref().map(|e| e.trim().to_lowercase());
        let name = patch.name.as_ref().map(|n| n.trim().to_string());
        let avatar = patch.avatar.clone();

        let taken_email = email.clone();
        let outcome = self.users.update_unique(
            id,
            |user| {
                if let Some(name) = name {
                    user.name = name;
                }
                if let Some(email) = email {
                    user.email = email;
                }
                if let Some(avatar) = avatar {
                    user.avatar = avatar;
                }
                user.updated_at = Utc::now();
            },
            |other| taken_email.as_ref().is_some_and(|e| other.email == *e),
        )?;

        match outcome {
            UpdateOutcome::Updated(user) => Ok(Some(user)),
            UpdateOutcome::NotFound => Ok(None),
            UpdateOutcome::Conflict => {
                Err(ApiError::Conflict("Email is already in use".to_string()))
            }
        }
    }

    /// Re-hash and replace a user's password
    pub async fn update_password(&self, id: Uuid, new_password: &str) -> ApiResult<Option<User>> {
        let password_hash = self.hash_password(new_password)?;

        let updated = self.users.update(id, |user| {
            user.password_hash = password_hash;
            user.updated_at = Utc::now();
        })?;

        Ok(updated)
    }

    /// Delete a user record
    ///
    /// The caller is responsible for deleting the user's tasks first; see
    /// the account-deletion handler for the ordered two-step.
    pub async fn delete(&self, id: Uuid) -> ApiResult<bool> {
        Ok(self.users.remove(id)?.is_some())
    }
}
