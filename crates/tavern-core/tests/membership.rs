//! Membership commands: gating, argument validation, and the GM
//! succession invariant.

mod common;

use common::{fixture_with_group, ALICE, BOB, CAROL};
use tavern_core::gateway::Gateway;
use tavern_core::types::{Caller, UserId};
use tavern_core::GroupError;

async fn members(f: &common::Fixture, handle: &tavern_core::GroupHandle) -> Vec<UserId> {
    let group = handle.snapshot().await;
    f.gateway.role_members(group.member_role_id).await.unwrap()
}

async fn gms(f: &common::Fixture, handle: &tavern_core::GroupHandle) -> Vec<UserId> {
    let group = handle.snapshot().await;
    f.gateway.role_members(group.gm_role_id).await.unwrap()
}

#[tokio::test]
async fn gm_can_add_member() {
    let (f, handle) = fixture_with_group("Curse of Strahd", ALICE).await;
    handle
        .add_member(&f.gateway, Caller::new(ALICE), Some(BOB))
        .await
        .unwrap();
    assert_eq!(members(&f, &handle).await, vec![ALICE, BOB]);
    assert_eq!(gms(&f, &handle).await, vec![ALICE]);
}

#[tokio::test]
async fn add_member_requires_target() {
    let (f, handle) = fixture_with_group("Strahd", ALICE).await;
    let err = handle
        .add_member(&f.gateway, Caller::new(ALICE), None)
        .await
        .unwrap_err();
    assert!(matches!(err, GroupError::NoUserProvided));
}

#[tokio::test]
async fn non_gm_cannot_add_or_kick() {
    let (f, handle) = fixture_with_group("Strahd", ALICE).await;
    handle
        .add_member(&f.gateway, Caller::new(ALICE), Some(BOB))
        .await
        .unwrap();

    // Bob is a member but not a GM; the gate fails before any mutation.
    let err = handle
        .add_member(&f.gateway, Caller::new(BOB), Some(CAROL))
        .await
        .unwrap_err();
    assert!(matches!(err, GroupError::NotAuthorized { .. }));
    assert_eq!(members(&f, &handle).await, vec![ALICE, BOB]);

    let err = handle
        .kick_member(&f.gateway, Caller::new(BOB), Some(ALICE))
        .await
        .unwrap_err();
    assert!(matches!(err, GroupError::NotAuthorized { .. }));
    assert_eq!(members(&f, &handle).await, vec![ALICE, BOB]);
}

#[tokio::test]
async fn admin_bypasses_every_gate() {
    let (f, handle) = fixture_with_group("Strahd", ALICE).await;
    // Carol holds neither role but is a platform administrator.
    handle
        .add_member(&f.gateway, Caller::admin(CAROL), Some(BOB))
        .await
        .unwrap();
    handle
        .kick_member(&f.gateway, Caller::admin(CAROL), Some(BOB))
        .await
        .unwrap();
    assert_eq!(members(&f, &handle).await, vec![ALICE]);
}

#[tokio::test]
async fn self_kick_is_rejected_without_mutation() {
    let (f, handle) = fixture_with_group("Strahd", ALICE).await;
    let err = handle
        .kick_member(&f.gateway, Caller::new(ALICE), Some(ALICE))
        .await
        .unwrap_err();
    assert!(matches!(err, GroupError::CannotTargetSelf("kick")));
    assert_eq!(members(&f, &handle).await, vec![ALICE]);
    assert_eq!(gms(&f, &handle).await, vec![ALICE]);
}

#[tokio::test]
async fn kick_removes_both_roles() {
    let (f, handle) = fixture_with_group("Strahd", ALICE).await;
    handle
        .add_gm(&f.gateway, Caller::new(ALICE), Some(BOB))
        .await
        .unwrap();
    handle
        .kick_member(&f.gateway, Caller::new(ALICE), Some(BOB))
        .await
        .unwrap();
    assert_eq!(members(&f, &handle).await, vec![ALICE]);
    assert_eq!(gms(&f, &handle).await, vec![ALICE]);
}

#[tokio::test]
async fn kicking_the_last_gm_promotes_a_member() {
    let (f, handle) = fixture_with_group("Strahd", ALICE).await;
    handle
        .add_member(&f.gateway, Caller::new(ALICE), Some(BOB))
        .await
        .unwrap();
    // An admin kicks the only GM; Bob must inherit.
    let promoted = handle
        .kick_member(&f.gateway, Caller::admin(CAROL), Some(ALICE))
        .await
        .unwrap();
    assert_eq!(promoted, Some(BOB));
    assert_eq!(members(&f, &handle).await, vec![BOB]);
    assert_eq!(gms(&f, &handle).await, vec![BOB]);
}

#[tokio::test]
async fn leave_requires_membership() {
    let (f, handle) = fixture_with_group("Strahd", ALICE).await;
    let err = handle
        .leave(&f.gateway, Caller::new(BOB))
        .await
        .unwrap_err();
    assert!(matches!(err, GroupError::NotAuthorized { .. }));
}

#[tokio::test]
async fn gm_leaving_promotes_remaining_member() {
    let (f, handle) = fixture_with_group("Strahd", ALICE).await;
    handle
        .add_member(&f.gateway, Caller::new(ALICE), Some(BOB))
        .await
        .unwrap();
    let promoted = handle.leave(&f.gateway, Caller::new(ALICE)).await.unwrap();
    assert_eq!(promoted, Some(BOB));
    assert_eq!(members(&f, &handle).await, vec![BOB]);
    assert_eq!(gms(&f, &handle).await, vec![BOB]);
}

#[tokio::test]
async fn sole_member_leaving_empties_the_group() {
    let (f, handle) = fixture_with_group("Strahd", ALICE).await;
    let promoted = handle.leave(&f.gateway, Caller::new(ALICE)).await.unwrap();
    // Nobody left to promote; the invariant holds vacuously.
    assert_eq!(promoted, None);
    assert!(members(&f, &handle).await.is_empty());
    assert!(gms(&f, &handle).await.is_empty());
}

#[tokio::test]
async fn add_gm_grants_membership_too() {
    let (f, handle) = fixture_with_group("Strahd", ALICE).await;
    handle
        .add_gm(&f.gateway, Caller::new(ALICE), Some(BOB))
        .await
        .unwrap();
    assert_eq!(members(&f, &handle).await, vec![ALICE, BOB]);
    assert_eq!(gms(&f, &handle).await, vec![ALICE, BOB]);
}

#[tokio::test]
async fn resigning_gm_promotes_another_member() {
    let (f, handle) = fixture_with_group("Strahd", ALICE).await;
    handle
        .add_member(&f.gateway, Caller::new(ALICE), Some(BOB))
        .await
        .unwrap();
    let promoted = handle
        .resign_gm(&f.gateway, Caller::new(ALICE))
        .await
        .unwrap();
    assert_eq!(promoted, Some(BOB));
    assert_eq!(gms(&f, &handle).await, vec![BOB]);
    // Alice stays a plain member.
    assert_eq!(members(&f, &handle).await, vec![ALICE, BOB]);
}

#[tokio::test]
async fn sole_gm_resigning_alone_is_reinstated() {
    let (f, handle) = fixture_with_group("Strahd", ALICE).await;
    // Alice is the only member, so succession hands the GM role straight
    // back to her.
    let promoted = handle
        .resign_gm(&f.gateway, Caller::new(ALICE))
        .await
        .unwrap();
    assert_eq!(promoted, Some(ALICE));
    assert_eq!(gms(&f, &handle).await, vec![ALICE]);
}

#[tokio::test]
async fn succession_invariant_holds_across_sequences() {
    let (f, handle) = fixture_with_group("Strahd", ALICE).await;
    let admin = Caller::admin(common::OPERATOR);

    handle.add_member(&f.gateway, admin, Some(BOB)).await.unwrap();
    handle.add_member(&f.gateway, admin, Some(CAROL)).await.unwrap();
    handle.add_gm(&f.gateway, admin, Some(BOB)).await.unwrap();
    handle.resign_gm(&f.gateway, Caller::new(ALICE)).await.unwrap();
    handle.kick_member(&f.gateway, admin, Some(BOB)).await.unwrap();
    handle.leave(&f.gateway, Caller::new(CAROL)).await.unwrap();
    handle.leave(&f.gateway, Caller::new(ALICE)).await.unwrap();

    // After every step: members non-empty implies GMs non-empty. Spot
    // check the terminal state; intermediate states are covered by the
    // promotion assertions in the focused tests above.
    assert!(members(&f, &handle).await.is_empty());
    assert!(gms(&f, &handle).await.is_empty());
}
