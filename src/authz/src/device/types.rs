//! Device grant data model
//!
//! A device grant is created `Pending` and reaches exactly one terminal
//! outcome: approved, denied, or expired. Expiry is evaluated lazily on
//! every observation rather than by a background sweep, which is also how
//! revocation works: forcing `expires_at` into the past.

use crate::policy::{PolicyHolder, PolicyId};
use crate::scope::ScopeSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use xivauth_core::{ClientId, OwnerId};

/// Observed state of a device grant at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceGrantStatus {
    /// Waiting for the resource owner to enter the user code
    Pending,
    /// Approved by a resource owner (terminal)
    Approved,
    /// Denied by a resource owner (terminal, record deleted)
    Denied,
    /// Past `expires_at` (terminal), whether it ran out or was revoked
    Expired,
}

/// A device-flow authorization grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceGrant {
    /// Unique grant identifier
    pub id: Uuid,

    /// Human-enterable code, stored normalized. Cleared the instant the
    /// grant is approved so the code can never be looked up or reused.
    pub user_code: Option<String>,

    /// Opaque code held by the polling device
    pub device_code: String,

    /// Scopes requested by the device
    pub scopes: ScopeSet,

    /// Requesting OAuth client
    pub client_id: ClientId,

    /// Absolute expiry; the grant is `Expired` the instant `now` passes it
    pub expires_at: DateTime<Utc>,

    /// Bound on approval, absent while pending
    pub resource_owner_id: Option<OwnerId>,

    /// Set on the value returned from a denial; the stored record is deleted
    pub denied: bool,

    /// Reference to the restriction policy, set only on approval with
    /// restrictions
    pub policy_id: Option<PolicyId>,
}

impl DeviceGrant {
    /// Creates a pending grant with pre-generated codes
    pub fn new(
        client_id: ClientId,
        scopes: ScopeSet,
        user_code: String,
        device_code: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_code: Some(user_code),
            device_code,
            scopes,
            client_id,
            expires_at,
            resource_owner_id: None,
            denied: false,
            policy_id: None,
        }
    }

    /// True once `now` has passed `expires_at`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Derives the observed state; exactly one holds at any observation
    pub fn status(&self, now: DateTime<Utc>) -> DeviceGrantStatus {
        if self.denied {
            DeviceGrantStatus::Denied
        } else if self.is_expired(now) {
            DeviceGrantStatus::Expired
        } else if self.resource_owner_id.is_some() {
            DeviceGrantStatus::Approved
        } else {
            DeviceGrantStatus::Pending
        }
    }
}

// The grant side of the 1:1 policy attachment; the issuer reads the
// reference from here when minting the device's tokens.
impl PolicyHolder for DeviceGrant {
    fn policy_id(&self) -> Option<PolicyId> {
        self.policy_id
    }

    fn set_policy_id(&mut self, id: Option<PolicyId>) {
        self.policy_id = id;
    }
}
