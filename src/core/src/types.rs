//! Core identity and resource types
//!
//! Every restrictable resource the platform knows about is addressed through
//! [`ResourceRef`], a closed tagged union: the policy engine's type-dispatch
//! is checked exhaustively by the compiler instead of comparing free-form
//! type-name strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Resource owner identifier (a portal user account)
pub type OwnerId = Uuid;

/// Per-resource identifier
pub type ResourceId = Uuid;

/// OAuth client identifier, opaque to this subsystem
pub type ClientId = String;

/// The closed set of resource kinds a policy can restrict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A verified game character
    Character,
    /// A linked third-party identity (Discord, Steam, ...)
    SocialIdentity,
}

impl ResourceKind {
    /// Scope family associated with this kind (e.g. `character:manage`)
    pub fn scope_family(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::SocialIdentity => "social_identity",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scope_family())
    }
}

/// Reference to a single restrictable resource
///
/// A single policy may mix kinds, so the reference carries its kind tag.
///
/// # Examples
///
/// ```
/// use xivauth_core::{ResourceKind, ResourceRef};
/// use uuid::Uuid;
///
/// let id = Uuid::new_v4();
/// let resource = ResourceRef::Character(id);
/// assert_eq!(resource.kind(), ResourceKind::Character);
/// assert_eq!(resource.id(), id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ResourceRef {
    /// A verified game character
    Character(ResourceId),
    /// A linked third-party identity
    SocialIdentity(ResourceId),
}

impl ResourceRef {
    /// Returns the kind tag of this reference
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Character(_) => ResourceKind::Character,
            Self::SocialIdentity(_) => ResourceKind::SocialIdentity,
        }
    }

    /// Returns the per-resource identifier
    pub fn id(&self) -> ResourceId {
        match self {
            Self::Character(id) | Self::SocialIdentity(id) => *id,
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}
