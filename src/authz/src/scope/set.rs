/// Scope set queries
///
/// A caller's granted scopes as a set, answering the three questions the
/// rest of the subsystem needs: is a scope granted (directly or via
/// `family:manage`), does any member of a family appear, and does the set
/// carry a bulk grant for a family.

use super::types::{Scope, ScopeError, ScopeResult, ALL_CHILD, MANAGE_CHILD};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// An immutable set of granted scopes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeSet {
    scopes: BTreeSet<Scope>,
}

impl ScopeSet {
    /// Creates an empty scope set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a set from individual scope strings
    pub fn parse<I, S>(scopes: I) -> ScopeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let scopes = scopes
            .into_iter()
            .map(|s| Scope::new(s.as_ref()))
            .collect::<ScopeResult<BTreeSet<_>>>()?;
        Ok(Self { scopes })
    }

    /// Exact containment, with no manage-superset widening
    pub fn contains(&self, scope: &Scope) -> bool {
        self.scopes.contains(scope)
    }

    /// Whether `scope` is granted
    ///
    /// True on exact containment, or when `family:manage` for the same family
    /// is present: manage is always a superset of any sibling scope.
    pub fn has(&self, scope: &Scope) -> bool {
        self.scopes.contains(scope)
            || self
                .scopes
                .contains(&Scope::with_child(scope.family(), MANAGE_CHILD))
    }

    /// Whether any scope of `family` is present, minus exclusions
    ///
    /// `excluding` lists canonical scope strings (e.g. `"character:all"`)
    /// that do not count as membership.
    pub fn has_family_member(&self, family: &str, excluding: &[&str]) -> bool {
        self.scopes
            .iter()
            .filter(|s| s.family() == family)
            .any(|s| !excluding.contains(&s.to_string().as_str()))
    }

    /// Whether a bulk grant for `family` is present
    ///
    /// `family:all` and `family:manage` both grant access to all of the
    /// owner's resources of that family, bypassing per-resource policy
    /// restriction entirely.
    pub fn has_bulk(&self, family: &str) -> bool {
        self.scopes.contains(&Scope::with_child(family, ALL_CHILD))
            || self.scopes.contains(&Scope::with_child(family, MANAGE_CHILD))
    }

    /// Whether `family:manage` specifically is present
    pub fn has_manage(&self, family: &str) -> bool {
        self.scopes.contains(&Scope::with_child(family, MANAGE_CHILD))
    }

    /// Iterates the contained scopes in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    /// Number of scopes in the set
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// True when no scopes are present
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl FromIterator<Scope> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = Scope>>(iter: I) -> Self {
        Self {
            scopes: iter.into_iter().collect(),
        }
    }
}

impl FromStr for ScopeSet {
    type Err = ScopeError;

    /// Parses the space-delimited OAuth `scope` parameter form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.split_whitespace())
    }
}

impl fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for scope in &self.scopes {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}", scope)?;
            first = false;
        }
        Ok(())
    }
}
