//! Shared fixtures for the end-to-end suites
//!
//! Provides the portal-side stand-ins the authorization subsystem is tested
//! against: a character roster with verification state and a fake
//! issuer-side access token.

use uuid::Uuid;
use xivauth_authz::filter::OwnedResource;
use xivauth_authz::policy::{PolicyHolder, PolicyId};
use xivauth_core::{OwnerId, ResourceRef};

/// A verified-or-not game character as the portal enumerates them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub name: String,
    pub verified: bool,
}

impl Character {
    pub fn verified(owner_id: OwnerId, name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.to_string(),
            verified: true,
        }
    }

    pub fn unverified(owner_id: OwnerId, name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.to_string(),
            verified: false,
        }
    }
}

impl OwnedResource for Character {
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::Character(self.id)
    }

    fn baseline_valid(&self) -> bool {
        self.verified
    }
}

/// Issuer-side access token: holds the nullable policy reference
#[derive(Debug, Default, Clone)]
pub struct AccessToken {
    pub policy_id: Option<PolicyId>,
}

impl PolicyHolder for AccessToken {
    fn policy_id(&self) -> Option<PolicyId> {
        self.policy_id
    }

    fn set_policy_id(&mut self, id: Option<PolicyId>) {
        self.policy_id = id;
    }
}
