//! Unified error types for the XIVAuth platform
//!
//! This module provides a central error type that subsystem-specific error
//! types can be converted into at crate boundaries.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for the XIVAuth platform
#[derive(Debug, Error)]
pub enum CoreError {
    /// Authentication/Authorization errors
    #[error("Auth error: {0}")]
    Auth(String),

    /// Persistence layer errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/Deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input/state
    #[error("Invalid: {0}")]
    Invalid(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}
