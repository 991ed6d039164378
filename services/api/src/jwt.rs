//! JWT session issuance and verification
//!
//! Tokens are self-contained HS256 credentials carrying the user identity
//! and expiry. There is no server-side session state and no revocation
//! list: a token stays valid for its full lifetime unless the signing
//! secret rotates. Logout is a client-side discard.

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const FALLBACK_SECRET: &str = "taskdeck_dev_secret_change_me";

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Token lifetime in seconds (default: 7 days)
    pub expiry: u64,
    /// Whether the development fallback secret is in use
    pub uses_fallback_secret: bool,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: signing secret (falls back to a development value)
    /// - `JWT_EXPIRY`: token lifetime in seconds (default: 604800)
    pub fn from_env() -> Self {
        let (secret, uses_fallback_secret) = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => (secret, false),
            _ => (FALLBACK_SECRET.to_string(), true),
        };

        let expiry = std::env::var("JWT_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(604800);

        Self {
            secret,
            expiry,
            uses_fallback_secret,
        }
    }

    /// Build a config around an explicit secret, with the default lifetime
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiry: 604800,
            uses_fallback_secret: false,
        }
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// User email at issuance time
    pub email: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry: u64,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: &JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;
        // No clock leeway: an expired token is expired
        validation.leeway = 0;

        Self {
            encoding_key,
            decoding_key,
            validation,
            expiry: config.expiry,
        }
    }

    /// Issue a token bound to a user identity
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + self.expiry,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify a token and return its claims
    ///
    /// Fails when the signature does not match, the payload is malformed,
    /// or the expiry has passed.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Token lifetime in seconds
    pub fn expiry(&self) -> u64 {
        self.expiry
    }
}
