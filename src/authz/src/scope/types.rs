/// Scope type definitions and validation
///
/// Provides the core Scope type: a scope string parsed once into its
/// `family` and optional `child` parts, replacing repeated string splitting
/// throughout the engine.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Child scope that grants every sibling scope in its family
pub const MANAGE_CHILD: &str = "manage";

/// Child scope that grants access to all of the owner's resources of a family
pub const ALL_CHILD: &str = "all";

/// Result type for scope operations
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Errors that can occur during scope parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    /// Empty scope string provided
    #[error("scope cannot be empty")]
    EmptyScope,
    /// Scope segment is empty (e.g. `character:`)
    #[error("scope segment cannot be empty")]
    EmptySegment,
    /// More than `family:child` depth
    #[error("scope has too many segments: {0}")]
    TooManySegments(String),
}

/// A single parsed scope: `family` or `family:child`
///
/// # Examples
///
/// ```
/// use xivauth_authz::scope::Scope;
/// use std::str::FromStr;
///
/// let scope = Scope::from_str("character:jwt").unwrap();
/// assert_eq!(scope.family(), "character");
/// assert_eq!(scope.child(), Some("jwt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scope {
    family: String,
    child: Option<String>,
}

impl Scope {
    /// Parses a scope from a string slice
    pub fn new(s: &str) -> ScopeResult<Self> {
        if s.is_empty() {
            return Err(ScopeError::EmptyScope);
        }

        let mut parts = s.split(':');
        let family = parts.next().unwrap_or_default().to_string();
        let child = parts.next().map(str::to_string);

        if parts.next().is_some() {
            return Err(ScopeError::TooManySegments(s.to_string()));
        }
        if family.is_empty() || child.as_deref() == Some("") {
            return Err(ScopeError::EmptySegment);
        }

        Ok(Self { family, child })
    }

    /// Builds the `family` scope for a family name
    pub fn family_root(family: &str) -> Self {
        Self {
            family: family.to_string(),
            child: None,
        }
    }

    /// Builds the `family:child` scope for a family name
    pub fn with_child(family: &str, child: &str) -> Self {
        Self {
            family: family.to_string(),
            child: Some(child.to_string()),
        }
    }

    /// Returns the scope family (the part before `:`)
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Returns the child scope, if any (the part after `:`)
    pub fn child(&self) -> Option<&str> {
        self.child.as_deref()
    }

    /// True for `family:manage`
    pub fn is_manage(&self) -> bool {
        self.child.as_deref() == Some(MANAGE_CHILD)
    }

    /// True for the two bulk grants, `family:all` and `family:manage`
    pub fn is_bulk(&self) -> bool {
        matches!(self.child.as_deref(), Some(ALL_CHILD) | Some(MANAGE_CHILD))
    }
}

impl FromStr for Scope {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.child {
            Some(child) => write!(f, "{}:{}", self.family, child),
            None => f.write_str(&self.family),
        }
    }
}

// Scopes serialize as their canonical string form so that persisted grants
// carry the same representation the OAuth wire does.
impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Scope::new(&s).map_err(de::Error::custom)
    }
}
