//! Authorized-resource filtering
//!
//! Combines scope classification with the policy engine to compute, for a
//! token and a resource family, the accessible subset of the owner's
//! resources. Runs on every resource-scoped API request.

use crate::policy::PermissiblePolicy;
use crate::scope::ScopeSet;
use tracing::debug;
use xivauth_core::ResourceRef;

/// A candidate resource as seen by an external resource enumerator
///
/// `baseline_valid` is the "verified" predicate owned by the resource's own
/// lifecycle rules; this subsystem only consults it.
pub trait OwnedResource {
    /// Reference used for policy evaluation
    fn resource_ref(&self) -> ResourceRef;

    /// Whether the resource passes its lifecycle's baseline validity check
    fn baseline_valid(&self) -> bool;
}

/// Computes the accessible subset of `resources` for one scope family
///
/// Semantics:
/// - `family:manage` bypasses the baseline-validity restriction (manage sees
///   unverified resources too); any other scope shape restricts to the
///   baseline-valid subset first.
/// - With a policy attached, each remaining resource is evaluated with
///   `fallback = true` (a kind the policy does not manage stays accessible).
/// - Without a policy, a bulk scope (`family:all` / `family:manage`) grants
///   the whole remaining set, and a bare family scope grants nothing:
///   default-deny is the deliberate safety choice for a non-bulk scope with
///   no policy.
pub fn accessible<T: OwnedResource>(
    resources: Vec<T>,
    scopes: &ScopeSet,
    policy: Option<&PermissiblePolicy>,
    family: &str,
) -> Vec<T> {
    let manage = scopes.has_manage(family);
    let bulk = scopes.has_bulk(family);

    let baseline: Vec<T> = resources
        .into_iter()
        .filter(|r| manage || r.baseline_valid())
        .collect();

    match policy {
        Some(policy) => {
            let kept: Vec<T> = baseline
                .into_iter()
                .filter(|r| policy.evaluate(&r.resource_ref(), true))
                .collect();
            debug!(family, policy = %policy.id(), kept = kept.len(), "policy-filtered access");
            kept
        }
        None if bulk => {
            debug!(family, kept = baseline.len(), "bulk access without policy");
            baseline
        }
        None => {
            debug!(family, "no policy and no bulk scope, default deny");
            Vec::new()
        }
    }
}
