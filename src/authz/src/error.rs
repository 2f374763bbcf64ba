//! Error types for the authorization subsystem

use crate::scope::{ScopeConflict, ScopeError};
use thiserror::Error;

/// Authorization subsystem errors
///
/// All variants are recoverable and user-facing: they map to a rejected
/// request with an explanatory reason, never a crash.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// One or more mutually-exclusive scope groups requested together.
    /// Carries every violated group so the caller can surface all conflicts
    /// at once.
    #[error("incompatible scopes requested: {}", format_conflicts(.0))]
    IncompatibleScopes(Vec<ScopeConflict>),

    /// User-code lookup found nothing after normalization
    #[error("unknown or already-used device code")]
    InvalidUserCode,

    /// User code resolved to a grant past its expiry
    #[error("device code has expired")]
    ExpiredUserCode,

    /// A pending grant with the same user code already exists
    #[error("user code collision for pending grant")]
    DuplicateUserCode,

    /// A grant/token carries a policy reference that does not resolve
    #[error("permissible policy not found: {0}")]
    PolicyNotFound(uuid::Uuid),

    /// Malformed scope string
    #[error("invalid scope: {0}")]
    Scope(#[from] ScopeError),

    /// Persistence layer failure; fatal to the enclosing authorization attempt
    #[error("storage error: {0}")]
    Storage(String),
}

fn format_conflicts(conflicts: &[ScopeConflict]) -> String {
    conflicts
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
