//! Device grant persistence
//!
//! The store's atomic update-with-precondition primitive is what makes the
//! approval transition race-free: binding the owner, attaching the policy
//! reference, and clearing the user code happen as one persisted write, so a
//! lookup strictly after it sees "not found by code" and one strictly before
//! sees the pending grant. No intermediate state is externally observable.

use super::types::DeviceGrant;
use crate::error::{AuthzError, Result};
use crate::policy::PolicyId;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;
use xivauth_core::OwnerId;

/// Device grant storage backend
#[async_trait]
pub trait DeviceGrantStore: Send + Sync {
    /// Persists a new pending grant
    ///
    /// # Errors
    ///
    /// [`AuthzError::DuplicateUserCode`] when another non-expired,
    /// non-approved grant already holds the same user code.
    async fn insert(&self, grant: DeviceGrant, now: DateTime<Utc>) -> Result<()>;

    /// Looks a grant up by its normalized user code
    ///
    /// The caller normalizes; raw input never reaches the store.
    async fn find_by_user_code(&self, normalized_code: &str) -> Result<Option<DeviceGrant>>;

    /// Looks a grant up by its opaque device code
    async fn find_by_device_code(&self, device_code: &str) -> Result<Option<DeviceGrant>>;

    /// Atomically approves a grant that is still pending
    ///
    /// In one write: binds `owner`, sets the policy reference, and clears
    /// the user code. The precondition is that the user code is still set
    /// and the grant unexpired; a concurrent second approval therefore fails
    /// with [`AuthzError::InvalidUserCode`] rather than double-approving.
    async fn approve_if_pending(
        &self,
        id: Uuid,
        owner: OwnerId,
        policy_id: Option<PolicyId>,
        now: DateTime<Utc>,
    ) -> Result<DeviceGrant>;

    /// Forces `expires_at` into the past (revocation path)
    async fn expire(&self, id: Uuid, now: DateTime<Utc>) -> Result<()>;

    /// Deletes a grant outright (denial path)
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Housekeeping: removes expired rows. Storage-only; the state machine
    /// is correct without it running at any particular cadence.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize>;
}

/// In-memory device grant store implementation
pub struct InMemoryDeviceGrantStore {
    grants: Arc<RwLock<HashMap<Uuid, DeviceGrant>>>,
}

impl InMemoryDeviceGrantStore {
    /// Creates a new in-memory device grant store
    pub fn new() -> Self {
        Self {
            grants: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryDeviceGrantStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceGrantStore for InMemoryDeviceGrantStore {
    async fn insert(&self, grant: DeviceGrant, now: DateTime<Utc>) -> Result<()> {
        let mut grants = self.grants.write().await;

        if let Some(code) = &grant.user_code {
            let taken = grants
                .values()
                .any(|g| g.user_code.as_deref() == Some(code.as_str()) && !g.is_expired(now));
            if taken {
                return Err(AuthzError::DuplicateUserCode);
            }
        }

        grants.insert(grant.id, grant);
        Ok(())
    }

    async fn find_by_user_code(&self, normalized_code: &str) -> Result<Option<DeviceGrant>> {
        let grants = self.grants.read().await;
        Ok(grants
            .values()
            .find(|g| g.user_code.as_deref() == Some(normalized_code))
            .cloned())
    }

    async fn find_by_device_code(&self, device_code: &str) -> Result<Option<DeviceGrant>> {
        let grants = self.grants.read().await;
        Ok(grants
            .values()
            .find(|g| g.device_code == device_code)
            .cloned())
    }

    async fn approve_if_pending(
        &self,
        id: Uuid,
        owner: OwnerId,
        policy_id: Option<PolicyId>,
        now: DateTime<Utc>,
    ) -> Result<DeviceGrant> {
        let mut grants = self.grants.write().await;

        let grant = grants.get_mut(&id).ok_or(AuthzError::InvalidUserCode)?;
        if grant.user_code.is_none() {
            // Already approved; the code was cleared with that transition
            return Err(AuthzError::InvalidUserCode);
        }
        if grant.is_expired(now) {
            return Err(AuthzError::ExpiredUserCode);
        }

        grant.resource_owner_id = Some(owner);
        grant.policy_id = policy_id;
        grant.user_code = None;
        Ok(grant.clone())
    }

    async fn expire(&self, id: Uuid, now: DateTime<Utc>) -> Result<()> {
        let mut grants = self.grants.write().await;
        let grant = grants
            .get_mut(&id)
            .ok_or_else(|| AuthzError::Storage(format!("unknown grant: {id}")))?;
        grant.expires_at = now - Duration::seconds(1);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut grants = self.grants.write().await;
        grants.remove(&id);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut grants = self.grants.write().await;
        let before = grants.len();
        grants.retain(|_, g| !g.is_expired(now));
        Ok(before - grants.len())
    }
}
