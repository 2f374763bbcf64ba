//! # XIVAuth Core
//!
//! Shared types, traits, and error handling for the XIVAuth platform.
//! This package holds the identifiers and the resource-reference model that
//! the authorization subsystem and the portal layer both depend on.

pub mod clock;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, Result};
pub use types::{ClientId, OwnerId, ResourceId, ResourceKind, ResourceRef};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
