//! Policy persistence and the grant/token attachment interface
//!
//! The policy is context-free: the grant or token holds the (nullable)
//! reference, never the other way around. [`attach_policy`] persists the
//! policy before the holder's reference is populated, so a caller can never
//! observe a reference that does not resolve. On refresh-token exchange the
//! issuer copies the reference onto the new token and the same policy is
//! carried forward, not cloned.

use super::{PermissiblePolicy, PolicyId};
use crate::error::{AuthzError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Policy storage backend
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Fetches a policy by id
    async fn get(&self, id: PolicyId) -> Result<Option<PermissiblePolicy>>;

    /// Persists a policy atomically
    async fn put(&self, policy: PermissiblePolicy) -> Result<()>;

    /// Discards a policy (when its last holder is revoked)
    async fn delete(&self, id: PolicyId) -> Result<()>;
}

/// Implemented by the external issuer's grant and token types
///
/// The holder side of the 1:1 attachment: an optional foreign key to the
/// policy, settable exactly once per holder.
pub trait PolicyHolder {
    /// The currently attached policy reference, if any
    fn policy_id(&self) -> Option<PolicyId>;

    /// Replaces the policy reference
    fn set_policy_id(&mut self, id: Option<PolicyId>);
}

/// Persists `policy` and attaches it to `holder`
///
/// Precondition of a real attachment: the policy has at least one rule.
/// `None` (the builder produced no rules) and empty policies are a no-op:
/// "no restriction" is the absence of a policy. Persistence happens before
/// the holder's reference is set.
pub async fn attach_policy<H>(
    store: &dyn PolicyStore,
    holder: &mut H,
    policy: Option<PermissiblePolicy>,
) -> Result<()>
where
    H: PolicyHolder + ?Sized,
{
    let Some(policy) = policy else {
        return Ok(());
    };
    if policy.is_empty() {
        return Ok(());
    }

    let id = policy.id();
    store.put(policy).await?;
    holder.set_policy_id(Some(id));
    debug!(policy = %id, "policy attached");
    Ok(())
}

/// Resolves the policy attached to `holder`, if any
///
/// Used by the issuer when minting a dependent token from a grant. A
/// dangling reference is an error: the policy must have been persisted
/// before the holder became visible.
pub async fn policy_for<H>(
    store: &dyn PolicyStore,
    holder: &H,
) -> Result<Option<PermissiblePolicy>>
where
    H: PolicyHolder + ?Sized,
{
    let Some(id) = holder.policy_id() else {
        return Ok(None);
    };
    match store.get(id).await? {
        Some(policy) => Ok(Some(policy)),
        None => Err(AuthzError::PolicyNotFound(id)),
    }
}

/// In-memory policy store implementation
pub struct InMemoryPolicyStore {
    policies: Arc<RwLock<HashMap<PolicyId, PermissiblePolicy>>>,
}

impl InMemoryPolicyStore {
    /// Creates a new in-memory policy store
    pub fn new() -> Self {
        Self {
            policies: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryPolicyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn get(&self, id: PolicyId) -> Result<Option<PermissiblePolicy>> {
        let policies = self.policies.read().await;
        Ok(policies.get(&id).cloned())
    }

    async fn put(&self, policy: PermissiblePolicy) -> Result<()> {
        let mut policies = self.policies.write().await;
        policies.insert(policy.id(), policy);
        Ok(())
    }

    async fn delete(&self, id: PolicyId) -> Result<()> {
        let mut policies = self.policies.write().await;
        policies.remove(&id);
        Ok(())
    }
}
