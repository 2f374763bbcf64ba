//! Permissible policy definition and evaluation
//!
//! A permissible policy restricts an OAuth grant to a caller-chosen subset of
//! the resource owner's resources. It is an order-irrelevant collection of
//! allow/deny rules; evaluation is per resource kind, with three modes:
//!
//! - **unmanaged**: no rule mentions the candidate's kind; the caller-supplied
//!   fallback decides,
//! - **allow-list**: at least one allow rule exists for the kind; only listed
//!   resources pass, so anything created after grant time is denied,
//! - **deny-list**: only deny rules exist for the kind; everything passes
//!   except the listed resources, so later-created resources are allowed.
//!
//! An explicit deny on the exact resource always wins, regardless of any
//! allow rule for the same resource.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;
use xivauth_core::ResourceRef;

pub mod builder;
pub mod store;

pub use builder::{PolicyBuilder, RestrictionMode};
pub use store::{attach_policy, policy_for, InMemoryPolicyStore, PolicyHolder, PolicyStore};

/// Unique policy identifier
pub type PolicyId = Uuid;

/// A single allow/deny rule owned by exactly one policy
///
/// Rules are immutable once created: "editing" a rule means discarding it and
/// creating a new one. Insertion order is irrelevant to evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissibleRule {
    resource: ResourceRef,
    deny: bool,
}

impl PermissibleRule {
    /// Creates an allow rule for `resource`
    pub fn allow(resource: ResourceRef) -> Self {
        Self {
            resource,
            deny: false,
        }
    }

    /// Creates a deny rule for `resource`
    pub fn deny(resource: ResourceRef) -> Self {
        Self {
            resource,
            deny: true,
        }
    }

    /// The resource this rule applies to
    pub fn resource(&self) -> ResourceRef {
        self.resource
    }

    /// Whether this rule denies rather than allows
    pub fn is_deny(&self) -> bool {
        self.deny
    }
}

/// An order-irrelevant collection of permissible rules
///
/// Created empty at authorization time, appended to during construction,
/// persisted once, and never mutated after being attached to a grant or
/// token. The policy holds no reference to its attachment point; the
/// grant/token side owns the (nullable) back-reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissiblePolicy {
    id: PolicyId,
    rules: Vec<PermissibleRule>,
}

impl PermissiblePolicy {
    /// Creates an empty policy with a fresh identifier
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            rules: Vec::new(),
        }
    }

    /// Creates a policy from an existing rule collection
    pub fn from_rules<I: IntoIterator<Item = PermissibleRule>>(rules: I) -> Self {
        Self {
            id: Uuid::new_v4(),
            rules: rules.into_iter().collect(),
        }
    }

    /// Unique policy identifier
    pub fn id(&self) -> PolicyId {
        self.id
    }

    /// The rules of this policy
    pub fn rules(&self) -> &[PermissibleRule] {
        &self.rules
    }

    /// True when no rules have been added
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub(crate) fn add_rule(&mut self, rule: PermissibleRule) {
        self.rules.push(rule);
    }

    /// Evaluates whether `resource` is authorized under this policy
    ///
    /// `fallback` decides kinds the policy does not manage at all. Explicit
    /// deny on the exact resource always wins; any allow rule for the kind
    /// switches that kind into allow-list mode; a kind with only deny rules
    /// defaults to allowed.
    pub fn evaluate(&self, resource: &ResourceRef, fallback: bool) -> bool {
        let mut managed = false;
        let mut allow_mode = false;
        let mut allowed = false;

        for rule in self.rules.iter().filter(|r| r.resource.kind() == resource.kind()) {
            managed = true;
            if rule.deny && rule.resource == *resource {
                debug!(policy = %self.id, %resource, "explicit deny");
                return false;
            }
            if !rule.deny {
                allow_mode = true;
                if rule.resource == *resource {
                    allowed = true;
                }
            }
        }

        if !managed {
            debug!(policy = %self.id, %resource, fallback, "kind unmanaged by policy");
            return fallback;
        }

        // Allow-list mode: anything not explicitly allowed is denied.
        // Deny-list mode: the candidate was not among the denies, so it passes.
        if allow_mode {
            allowed
        } else {
            true
        }
    }
}

impl Default for PermissiblePolicy {
    fn default() -> Self {
        Self::new()
    }
}
