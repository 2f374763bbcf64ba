//! Grant-time policy construction
//!
//! Turns the resource selection a user makes on the authorization screen
//! into concrete rules. Selection runs once per restrictable resource kind,
//! each kind with its own inclusion/exclusion mode, against the candidates
//! that exist at grant time.

use super::{PermissiblePolicy, PermissibleRule};
use std::collections::HashSet;
use tracing::debug;
use xivauth_core::{ResourceId, ResourceRef};

/// How a selection restricts the candidates of one resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionMode {
    /// "Share only selected": allow rules for the selected candidates.
    /// Unselected candidates get no rule. The kind ends up in allow-list
    /// mode, so resources created after grant time are denied by default.
    IncludeSelected,
    /// "Share all except selected": deny rules for the unselected
    /// candidates. Selected candidates, and anything not yet existing, get
    /// no rule. The kind ends up in deny-list mode, so resources created
    /// after grant time are authorized by default.
    ExcludeSelected,
}

/// Accumulates rules across resource kinds into one policy
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    policy: PermissiblePolicy,
}

impl PolicyBuilder {
    /// Starts a builder around a fresh empty policy
    pub fn new() -> Self {
        Self {
            policy: PermissiblePolicy::new(),
        }
    }

    /// Applies one kind's selection to the policy under construction
    pub fn select(
        &mut self,
        candidates: &[ResourceRef],
        selected: &HashSet<ResourceId>,
        mode: RestrictionMode,
    ) -> &mut Self {
        for candidate in candidates {
            let rule = match mode {
                RestrictionMode::IncludeSelected if selected.contains(&candidate.id()) => {
                    PermissibleRule::allow(*candidate)
                }
                RestrictionMode::ExcludeSelected if !selected.contains(&candidate.id()) => {
                    PermissibleRule::deny(*candidate)
                }
                _ => continue,
            };
            self.policy.add_rule(rule);
        }
        self
    }

    /// Finishes construction
    ///
    /// Returns `None` when no rules were produced: an empty policy means "no
    /// restriction requested" and must be represented as the absence of a
    /// policy, never persisted or attached.
    pub fn finish(self) -> Option<PermissiblePolicy> {
        if self.policy.is_empty() {
            debug!("selection produced no rules, skipping policy construction");
            None
        } else {
            debug!(policy = %self.policy.id(), rules = self.policy.len(), "policy constructed");
            Some(self.policy)
        }
    }
}
