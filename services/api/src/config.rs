//! Service configuration loaded from environment variables

use anyhow::Result;
use tracing::warn;

use crate::jwt::JwtConfig;

/// Parameters for the password hashing work factor
///
/// Hashing cost is a correctness-relevant property of registration and
/// password change, so it is configured here rather than hard-coded.
#[derive(Debug, Clone, Copy)]
pub struct HashConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of iterations
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        // Argon2id defaults per the argon2 crate
        Self {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl HashConfig {
    /// Create a new HashConfig from environment variables
    ///
    /// # Environment Variables
    /// - `HASH_MEMORY_KIB`: Argon2 memory cost in KiB (default: 19456)
    /// - `HASH_ITERATIONS`: Argon2 iteration count (default: 2)
    /// - `HASH_PARALLELISM`: Argon2 lane count (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let memory_kib = std::env::var("HASH_MEMORY_KIB")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.memory_kib);
        let iterations = std::env::var("HASH_ITERATIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.iterations);
        let parallelism = std::env::var("HASH_PARALLELISM")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.parallelism);

        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server binds on
    pub port: u16,
    /// JWT signing configuration
    pub jwt: JwtConfig,
    /// Password hashing work factor
    pub hash: HashConfig,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `PORT`: HTTP port (default: 5000)
    /// - `JWT_SECRET`, `JWT_EXPIRY`: see [`JwtConfig::from_env`]
    /// - `HASH_*`: see [`HashConfig::from_env`]
    pub fn from_env() -> Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5000);

        let jwt = JwtConfig::from_env();
        if jwt.uses_fallback_secret {
            warn!("JWT_SECRET not set, using development fallback secret");
        }

        Ok(Self {
            port,
            jwt,
            hash: HashConfig::from_env(),
        })
    }
}
