//! End-to-end device flow
//!
//! Drives the subsystem the way the portal does: a device requests
//! authorization, the owner approves a restricted selection, the issuer
//! mints a token off the grant, and subsequent API requests filter the
//! owner's roster through the attached policy.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;
use xivauth_authz::device::{DeviceAuthorizer, InMemoryDeviceGrantStore, PollOutcome};
use xivauth_authz::filter::{accessible, OwnedResource};
use xivauth_authz::policy::{policy_for, InMemoryPolicyStore, PolicyStore, RestrictionMode};
use xivauth_authz::scope::ScopeSet;
use xivauth_authz::ResourceSelection;
use xivauth_core::{FixedClock, ResourceRef};
use xivauth_e2e_tests::{AccessToken, Character};

const T0: i64 = 1_700_000_000;

fn subsystem() -> (DeviceAuthorizer, Arc<InMemoryPolicyStore>) {
    let grants = Arc::new(InMemoryDeviceGrantStore::new());
    let policies = Arc::new(InMemoryPolicyStore::new());
    let clock = Arc::new(FixedClock::from_timestamp(T0));
    (
        DeviceAuthorizer::new(grants, policies.clone(), clock),
        policies,
    )
}

#[tokio::test]
async fn test_restricted_device_flow_end_to_end() {
    let (authorizer, policies) = subsystem();
    let owner = Uuid::new_v4();

    let alpha = Character::verified(owner, "Alpha Primrose");
    let beta = Character::verified(owner, "Beta Seabreeze");
    let roster = vec![alpha.clone(), beta.clone()];

    // 1. The device asks for character access
    let scopes = ScopeSet::from_str("character").unwrap();
    let grant = authorizer
        .request_authorization("cli-tool".to_string(), scopes.clone())
        .await
        .unwrap();
    let user_code = grant.user_code.clone().unwrap();

    // 2. The owner approves, sharing only Alpha
    let selection = ResourceSelection {
        candidates: roster.iter().map(|c| c.resource_ref()).collect(),
        selected: HashSet::from([alpha.id]),
        mode: RestrictionMode::IncludeSelected,
    };
    authorizer
        .approve(&user_code, owner, &[selection])
        .await
        .unwrap();

    // 3. The device's poll yields the approved grant; the issuer copies the
    //    policy reference onto the token it mints
    let approved = match authorizer.poll(&grant.device_code).await.unwrap() {
        PollOutcome::Approved(g) => g,
        other => panic!("expected approval, got {other:?}"),
    };
    let mut token = AccessToken::default();
    token.policy_id = approved.policy_id;

    // 4. An API request filters the owner's roster through the token policy
    let policy = policy_for(policies.as_ref(), &token).await.unwrap();
    let visible = accessible(roster.clone(), &scopes, policy.as_ref(), "character");

    assert_eq!(visible, vec![alpha.clone()]);

    // 5. A character verified after grant time stays hidden (allow-list mode)
    let gamma = Character::verified(owner, "Gamma Duskwight");
    let mut grown = roster.clone();
    grown.push(gamma);
    let visible = accessible(grown, &scopes, policy.as_ref(), "character");
    assert_eq!(visible, vec![alpha]);
}

#[tokio::test]
async fn test_exclusion_flow_admits_future_characters() {
    let (authorizer, policies) = subsystem();
    let owner = Uuid::new_v4();

    let alpha = Character::verified(owner, "Alpha Primrose");
    let beta = Character::verified(owner, "Beta Seabreeze");
    let roster = vec![alpha.clone(), beta.clone()];

    let scopes = ScopeSet::from_str("character").unwrap();
    let grant = authorizer
        .request_authorization("cli-tool".to_string(), scopes.clone())
        .await
        .unwrap();
    let user_code = grant.user_code.clone().unwrap();

    // Share everything except Beta
    let selection = ResourceSelection {
        candidates: roster.iter().map(|c| c.resource_ref()).collect(),
        selected: HashSet::from([alpha.id]),
        mode: RestrictionMode::ExcludeSelected,
    };
    let approved = authorizer
        .approve(&user_code, owner, &[selection])
        .await
        .unwrap();

    let policy = policies
        .get(approved.policy_id.unwrap())
        .await
        .unwrap()
        .unwrap();

    let gamma = Character::verified(owner, "Gamma Duskwight");
    let visible = accessible(
        vec![alpha.clone(), beta.clone(), gamma.clone()],
        &scopes,
        Some(&policy),
        "character",
    );

    // Beta is blocked; the later-created Gamma is admitted by default
    assert_eq!(visible, vec![alpha, gamma]);
}

#[tokio::test]
async fn test_unrestricted_approval_with_bulk_scope() {
    let (authorizer, policies) = subsystem();
    let owner = Uuid::new_v4();

    let alpha = Character::verified(owner, "Alpha Primrose");
    let stray = Character::unverified(owner, "Stray Cloudbank");
    let roster = vec![alpha.clone(), stray.clone()];

    let scopes = ScopeSet::from_str("character:all").unwrap();
    let grant = authorizer
        .request_authorization("cli-tool".to_string(), scopes.clone())
        .await
        .unwrap();
    let user_code = grant.user_code.clone().unwrap();

    // Approval without restriction: no selection, no policy attached
    let approved = authorizer.approve(&user_code, owner, &[]).await.unwrap();
    assert_eq!(approved.policy_id, None);

    let mut token = AccessToken::default();
    token.policy_id = approved.policy_id;
    let policy = policy_for(policies.as_ref(), &token).await.unwrap();

    // Bulk access sees every verified character, but not unverified ones
    let visible = accessible(roster.clone(), &scopes, policy.as_ref(), "character");
    assert_eq!(visible, vec![alpha.clone()]);

    // manage additionally sees unverified resources
    let manage = ScopeSet::from_str("character:manage").unwrap();
    let visible = accessible(roster, &manage, None, "character");
    assert_eq!(visible, vec![alpha, stray]);
}

#[tokio::test]
async fn test_mixed_kind_policy_spans_families() {
    let (authorizer, policies) = subsystem();
    let owner = Uuid::new_v4();

    let alpha = Character::verified(owner, "Alpha Primrose");
    let discord = ResourceRef::SocialIdentity(Uuid::new_v4());
    let steam = ResourceRef::SocialIdentity(Uuid::new_v4());

    let scopes = ScopeSet::from_str("character social_identity").unwrap();
    let grant = authorizer
        .request_authorization("cli-tool".to_string(), scopes)
        .await
        .unwrap();
    let user_code = grant.user_code.clone().unwrap();

    // One selection per kind, modes chosen independently
    let selections = [
        ResourceSelection {
            candidates: vec![alpha.resource_ref()],
            selected: HashSet::from([alpha.id]),
            mode: RestrictionMode::IncludeSelected,
        },
        ResourceSelection {
            candidates: vec![discord, steam],
            selected: HashSet::from([discord.id()]),
            mode: RestrictionMode::ExcludeSelected,
        },
    ];
    let approved = authorizer
        .approve(&user_code, owner, &selections)
        .await
        .unwrap();

    let policy = policies
        .get(approved.policy_id.unwrap())
        .await
        .unwrap()
        .unwrap();

    assert!(policy.evaluate(&alpha.resource_ref(), true));
    assert!(policy.evaluate(&discord, true));
    assert!(!policy.evaluate(&steam, true));
}
