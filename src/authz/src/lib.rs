//! # XIVAuth Authorization
//!
//! Fine-grained OAuth resource authorization: restricts a grant (code flow
//! or device flow) to a caller-chosen subset of the resource owner's
//! resources, and re-evaluates that restriction on every downstream request.
//!
//! ## Components
//!
//! - **Scope sets** — parse `family`/`family:child` scope strings once and
//!   answer membership, manage-superset, and bulk-grant queries.
//! - **Scope compatibility** — rejects mutually-exclusive scope
//!   combinations, reporting every violated group.
//! - **Permissible policies** — per-resource allow/deny rules with
//!   allow-list / deny-list / unmanaged-kind evaluation semantics.
//! - **Policy builder** — turns a grant-time selection (inclusion or
//!   exclusion) into rules; an empty selection attaches no policy at all.
//! - **Authorized-resource filter** — the per-request combination of scope
//!   classification and policy evaluation.
//! - **Device authorization** — the pending/approved/denied/expired state
//!   machine behind the device flow, with normalized human-enterable codes.
//!
//! ## Example
//!
//! ```rust
//! use xivauth_authz::policy::{PermissiblePolicy, PermissibleRule};
//! use xivauth_core::ResourceRef;
//! use uuid::Uuid;
//!
//! let shared = ResourceRef::Character(Uuid::new_v4());
//! let hidden = ResourceRef::Character(Uuid::new_v4());
//!
//! let policy = PermissiblePolicy::from_rules([PermissibleRule::allow(shared)]);
//!
//! assert!(policy.evaluate(&shared, true));
//! assert!(!policy.evaluate(&hidden, true));
//! ```

pub mod device;
pub mod error;
pub mod filter;
pub mod policy;
pub mod scope;

// Re-export commonly used types
pub use device::{
    DeviceAuthorizer, DeviceAuthorizerConfig, DeviceGrant, DeviceGrantStatus, DeviceGrantStore,
    InMemoryDeviceGrantStore, PollOutcome, ResourceSelection,
};
pub use error::{AuthzError, Result};
pub use filter::{accessible, OwnedResource};
pub use policy::{
    attach_policy, policy_for, InMemoryPolicyStore, PermissiblePolicy, PermissibleRule,
    PolicyBuilder, PolicyHolder, PolicyId, PolicyStore, RestrictionMode,
};
pub use scope::{Scope, ScopeCompatibility, ScopeConflict, ScopeError, ScopeSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
