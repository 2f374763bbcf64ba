//! Device authorization state machine
//!
//! Manages the lifecycle of a device-flow grant:
//!
//! ```text
//! request ──> Pending ──approve──> Approved   (terminal, user code cleared)
//!                │
//!                ├────deny──────> Denied      (terminal, record deleted)
//!                └────expiry────> Expired     (terminal, lazy on lookup)
//! ```
//!
//! Approval optionally hands off to the policy builder so the approving
//! owner can expose only a subset of their resources; the constructed
//! policy is persisted before the grant's reference to it becomes visible.

mod code;
mod store;
mod types;

pub use code::{format_user_code, generate_device_code, generate_user_code, normalize_user_code,
               USER_CODE_ALPHABET};
pub use store::{DeviceGrantStore, InMemoryDeviceGrantStore};
pub use types::{DeviceGrant, DeviceGrantStatus};

use crate::error::{AuthzError, Result};
use crate::policy::{PolicyBuilder, PolicyStore, RestrictionMode};
use crate::scope::{ScopeCompatibility, ScopeSet};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use xivauth_core::{ClientId, Clock, OwnerId, ResourceId, ResourceRef};

/// One resource kind's share selection, supplied at approval time
#[derive(Debug, Clone)]
pub struct ResourceSelection {
    /// The owner's candidate resources of one kind, as enumerated by the
    /// external resource enumerator
    pub candidates: Vec<ResourceRef>,
    /// Ids the approving owner picked on the consent screen
    pub selected: HashSet<ResourceId>,
    /// Whether the picks are shared (include) or withheld (exclude)
    pub mode: RestrictionMode,
}

/// Device authorizer configuration
#[derive(Debug, Clone)]
pub struct DeviceAuthorizerConfig {
    /// How long a pending grant stays approvable
    pub code_ttl: chrono::Duration,

    /// User-code length in symbols, before display grouping
    pub user_code_length: usize,

    /// Attempts at minting a collision-free user code before giving up
    pub code_retry_limit: usize,
}

impl Default for DeviceAuthorizerConfig {
    fn default() -> Self {
        Self {
            code_ttl: chrono::Duration::minutes(15),
            user_code_length: 8,
            code_retry_limit: 4,
        }
    }
}

/// Outcome of a device-side poll by device code
///
/// Denied grants are deleted outright, so a device polling after a denial
/// sees [`PollOutcome::NotFound`] exactly as it would for a code that never
/// existed; only the device's own prior knowledge distinguishes the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Still waiting on the resource owner
    Pending,
    /// Approved; carries the finished grant for token issuance
    Approved(DeviceGrant),
    /// Known code, but the grant ran out (or was revoked)
    Expired,
    /// Unknown code: denied, purged, or never issued
    NotFound,
}

/// Orchestrates device grant lifecycle transitions
///
/// All time comparisons go through the injected [`Clock`]; expiry is
/// evaluated lazily on every lookup and approval attempt, never by a sweep.
pub struct DeviceAuthorizer {
    grants: Arc<dyn DeviceGrantStore>,
    policies: Arc<dyn PolicyStore>,
    compatibility: ScopeCompatibility,
    clock: Arc<dyn Clock>,
    config: DeviceAuthorizerConfig,
}

impl DeviceAuthorizer {
    /// Creates an authorizer with the default configuration
    pub fn new(
        grants: Arc<dyn DeviceGrantStore>,
        policies: Arc<dyn PolicyStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_config(grants, policies, clock, DeviceAuthorizerConfig::default())
    }

    /// Creates an authorizer with a custom configuration
    pub fn with_config(
        grants: Arc<dyn DeviceGrantStore>,
        policies: Arc<dyn PolicyStore>,
        clock: Arc<dyn Clock>,
        config: DeviceAuthorizerConfig,
    ) -> Self {
        Self {
            grants,
            policies,
            compatibility: ScopeCompatibility::default(),
            clock,
            config,
        }
    }

    /// Starts a device authorization: mints codes and persists a pending grant
    ///
    /// Rejects mutually-exclusive scope combinations before anything is
    /// persisted, reporting every violated group at once.
    pub async fn request_authorization(
        &self,
        client_id: ClientId,
        scopes: ScopeSet,
    ) -> Result<DeviceGrant> {
        if let Err(err) = self.compatibility.validate(&scopes) {
            warn!(%client_id, %scopes, "rejected device authorization: {err}");
            return Err(err);
        }

        let now = self.clock.now();
        let expires_at = now + self.config.code_ttl;

        let mut attempts = 0;
        loop {
            let grant = DeviceGrant::new(
                client_id.clone(),
                scopes.clone(),
                code::generate_user_code(self.config.user_code_length),
                code::generate_device_code(),
                expires_at,
            );
            match self.grants.insert(grant.clone(), now).await {
                Ok(()) => {
                    info!(grant = %grant.id, %client_id, "device grant created");
                    return Ok(grant);
                }
                Err(AuthzError::DuplicateUserCode) if attempts < self.config.code_retry_limit => {
                    attempts += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Resolves a human-entered code to its pending grant
    ///
    /// Input is normalized before comparison. An unknown (or already
    /// cleared) code is [`AuthzError::InvalidUserCode`]; a known but expired
    /// grant surfaces the distinct [`AuthzError::ExpiredUserCode`].
    pub async fn grant_for_user_code(&self, input: &str) -> Result<DeviceGrant> {
        let normalized = code::normalize_user_code(input);
        let grant = self
            .grants
            .find_by_user_code(&normalized)
            .await?
            .ok_or(AuthzError::InvalidUserCode)?;

        if grant.is_expired(self.clock.now()) {
            return Err(AuthzError::ExpiredUserCode);
        }
        Ok(grant)
    }

    /// Approves a pending grant on behalf of `owner`
    ///
    /// Builds a restriction policy from the owner's candidate resources and
    /// the consent-screen selections (one entry per resource kind, each with
    /// its own include/exclude mode). A selection that produces no rules
    /// means "no restriction requested" and attaches nothing. The policy is
    /// persisted before the approval write makes its reference visible, and
    /// the approval itself is a single atomic transition: a second attempt
    /// after the user code is cleared fails lookup instead of
    /// double-approving.
    pub async fn approve(
        &self,
        user_code: &str,
        owner: OwnerId,
        selections: &[ResourceSelection],
    ) -> Result<DeviceGrant> {
        let grant = self.grant_for_user_code(user_code).await?;

        let mut builder = PolicyBuilder::new();
        for selection in selections {
            builder.select(&selection.candidates, &selection.selected, selection.mode);
        }

        let policy_id = match builder.finish() {
            Some(policy) => {
                let id = policy.id();
                self.policies.put(policy).await?;
                Some(id)
            }
            None => None,
        };

        let approved = self
            .grants
            .approve_if_pending(grant.id, owner, policy_id, self.clock.now())
            .await?;
        info!(grant = %approved.id, %owner, restricted = policy_id.is_some(), "device grant approved");
        Ok(approved)
    }

    /// Denies a pending grant, deleting it outright
    ///
    /// Deletion (rather than flagging) makes any in-flight device poll see
    /// "not found" immediately. The returned value carries the terminal
    /// `Denied` state for the portal screen that performed the denial.
    pub async fn deny(&self, user_code: &str) -> Result<DeviceGrant> {
        let mut grant = self.grant_for_user_code(user_code).await?;
        self.grants.delete(grant.id).await?;
        grant.denied = true;
        info!(grant = %grant.id, "device grant denied");
        Ok(grant)
    }

    /// Device-side poll by opaque device code
    pub async fn poll(&self, device_code: &str) -> Result<PollOutcome> {
        let Some(grant) = self.grants.find_by_device_code(device_code).await? else {
            return Ok(PollOutcome::NotFound);
        };

        Ok(match grant.status(self.clock.now()) {
            DeviceGrantStatus::Pending => PollOutcome::Pending,
            DeviceGrantStatus::Approved => PollOutcome::Approved(grant),
            // Denied rows are deleted, so a stored grant can only be
            // pending, approved, or expired here
            DeviceGrantStatus::Denied | DeviceGrantStatus::Expired => PollOutcome::Expired,
        })
    }

    /// Revokes an approved grant by forcing its expiry into the past
    ///
    /// Reuses the lazy expiry check instead of a separate revoked flag.
    pub async fn revoke(&self, grant_id: Uuid) -> Result<()> {
        self.grants.expire(grant_id, self.clock.now()).await?;
        info!(grant = %grant_id, "device grant revoked");
        Ok(())
    }

    /// Housekeeping pass removing expired rows from storage
    pub async fn purge_expired(&self) -> Result<usize> {
        self.grants.purge_expired(self.clock.now()).await
    }
}
