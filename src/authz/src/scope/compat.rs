/// Scope compatibility validation
///
/// Certain scope combinations are mutually exclusive: requesting both
/// `character` and `character:all` is contradictory (per-resource selection
/// vs. a bulk grant). The validator checks a requested set against a table
/// of exclusive groups and reports every violated group, not just the first,
/// so the caller can surface all conflicts at once.

use super::set::ScopeSet;
use super::types::{Scope, ALL_CHILD};
use crate::error::{AuthzError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A violated exclusivity group: the requested members that collided
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeConflict {
    /// The members of the group that were simultaneously requested (>= 2)
    pub members: Vec<Scope>,
}

impl fmt::Display for ScopeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members = self
            .members
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{{{members}}} are mutually exclusive")
    }
}

/// Table of mutually-exclusive scope groups
#[derive(Debug, Clone)]
pub struct ScopeCompatibility {
    groups: Vec<Vec<Scope>>,
}

impl Default for ScopeCompatibility {
    /// The built-in table: a family's bare scope conflicts with its `:all`
    /// bulk form. `family:manage` is a superset grant, not a sibling, and is
    /// deliberately absent from the table.
    fn default() -> Self {
        let exclusive_families = ["character", "social_identity"];
        Self {
            groups: exclusive_families
                .iter()
                .map(|family| {
                    vec![
                        Scope::family_root(family),
                        Scope::with_child(family, ALL_CHILD),
                    ]
                })
                .collect(),
        }
    }
}

impl ScopeCompatibility {
    /// Creates a validator with a custom group table
    pub fn with_groups(groups: Vec<Vec<Scope>>) -> Self {
        Self { groups }
    }

    /// Returns every violated group in `requested`
    ///
    /// A group is violated when two or more of its members are simultaneously
    /// requested. Pure function, no side effects.
    pub fn check(&self, requested: &ScopeSet) -> Vec<ScopeConflict> {
        self.groups
            .iter()
            .filter_map(|group| {
                let members: Vec<Scope> = group
                    .iter()
                    .filter(|scope| requested.contains(scope))
                    .cloned()
                    .collect();
                (members.len() >= 2).then_some(ScopeConflict { members })
            })
            .collect()
    }

    /// Rejects `requested` if any exclusive group is violated
    pub fn validate(&self, requested: &ScopeSet) -> Result<()> {
        let conflicts = self.check(requested);
        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(AuthzError::IncompatibleScopes(conflicts))
        }
    }
}
