//! Custom error types for the common library
//!
//! This module defines application-specific error types that can be used
//! throughout the application.

use thiserror::Error;

/// Custom error type for document store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store could not be brought up at process start
    #[error("Store initialization error: {0}")]
    Initialization(String),

    /// A lock on a collection was poisoned by a panicking writer
    #[error("Store lock poisoned for collection '{0}'")]
    Poisoned(&'static str),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
