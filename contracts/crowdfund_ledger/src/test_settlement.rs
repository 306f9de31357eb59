extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use crate::test::{setup, units};
use crate::{invariants, Error, ProjectStatus};

const THIRTY_ONE_DAYS: u64 = 31 * 24 * 60 * 60;

// ── Refunds ──────────────────────────────────────────────────────────

#[test]
fn test_refund_after_archive_returns_exact_amount() {
    let s = setup();
    let creator = s.funded_actor(units(500));
    let id = s.create(&creator, units(600));

    s.client.contribute(&creator, &id, &units(500));
    s.client.archive_project(&creator, &id);
    assert_eq!(s.token.balance(&creator), 0);

    let refunded = s.client.refund(&creator, &id);

    assert_eq!(refunded, units(500));
    assert_eq!(s.token.balance(&creator), units(500));
    assert_eq!(s.client.get_contribution(&creator, &0).amount_funded, 0);
    assert_eq!(s.client.get_project(&id).funding_amount, 0);
    assert_eq!(s.token.balance(&s.client.address), 0);
}

#[test]
fn test_refund_after_failed_fundraising() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let backer = s.funded_actor(units(200));
    let id = s.create(&creator, units(300));

    s.client.contribute(&backer, &id, &units(100));
    s.client.contribute(&backer, &id, &units(100));
    assert_eq!(s.client.get_contribution(&backer, &0).amount_funded, units(200));
    assert_eq!(s.client.get_project(&id).funding_amount, units(200));

    s.advance(THIRTY_ONE_DAYS);
    assert!(s.client.is_refundable(&id));
    s.client.refund(&backer, &id);

    assert_eq!(s.client.get_contribution(&backer, &0).amount_funded, 0);
    assert_eq!(s.client.get_project(&id).funding_amount, 0);
    assert_eq!(s.token.balance(&backer), units(200));
    // The project itself stays active; only the caller's stake moved.
    assert_eq!(s.client.get_project(&id).status, ProjectStatus::Active);
}

#[test]
fn test_refund_not_allowed_during_fundraising() {
    let s = setup();
    let creator = s.funded_actor(units(20));
    let id = s.create(&creator, units(30));

    s.client.contribute(&creator, &id, &units(20));

    assert!(!s.client.is_refundable(&id));
    assert_eq!(
        s.client.try_refund(&creator, &id),
        Err(Ok(Error::NotRefundableNow))
    );
    assert_eq!(s.client.get_project(&id).funding_amount, units(20));
}

#[test]
fn test_refund_not_allowed_after_successful_fundraising() {
    let s = setup();
    let creator = s.funded_actor(units(40));
    let id = s.create(&creator, units(30));

    s.client.contribute(&creator, &id, &units(40));
    s.advance(THIRTY_ONE_DAYS);

    assert!(!s.client.is_refundable(&id));
    assert_eq!(
        s.client.try_refund(&creator, &id),
        Err(Ok(Error::NotRefundableNow))
    );

    // The beneficiary can still collect after the deadline.
    s.client.withdraw(&creator, &id);
    assert_eq!(s.token.balance(&creator), units(40));
}

#[test]
fn test_refund_not_allowed_after_withdraw() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let backer = s.funded_actor(units(40));
    let id = s.create(&creator, units(30));

    s.client.contribute(&backer, &id, &units(40));
    s.client.withdraw(&creator, &id);
    s.advance(THIRTY_ONE_DAYS);

    assert_eq!(
        s.client.try_refund(&backer, &id),
        Err(Ok(Error::NotRefundableNow))
    );
}

#[test]
fn test_refund_missing_project() {
    let s = setup();
    let backer = Address::generate(&s.env);
    assert_eq!(
        s.client.try_refund(&backer, &9),
        Err(Ok(Error::ProjectNotFound))
    );
    assert_eq!(
        s.client.try_is_refundable(&9),
        Err(Ok(Error::ProjectNotFound))
    );
}

#[test]
fn test_refund_with_nothing_owed_is_noop() {
    let s = setup();
    let creator = s.funded_actor(units(10));
    let stranger = Address::generate(&s.env);
    let id = s.create(&creator, units(30));

    s.client.contribute(&creator, &id, &units(10));
    s.client.archive_project(&creator, &id);

    assert_eq!(s.client.refund(&stranger, &id), 0);
    assert_eq!(s.client.get_project(&id).funding_amount, units(10));
    assert_eq!(s.client.contribution_count(&stranger), 0);
}

#[test]
fn test_refund_twice_pays_once() {
    let s = setup();
    let creator = s.funded_actor(units(10));
    let id = s.create(&creator, units(30));

    s.client.contribute(&creator, &id, &units(10));
    s.client.archive_project(&creator, &id);

    assert_eq!(s.client.refund(&creator, &id), units(10));
    assert_eq!(s.client.refund(&creator, &id), 0);
    assert_eq!(s.token.balance(&creator), units(10));
    assert_eq!(s.client.get_project(&id).funding_amount, 0);
}

#[test]
fn test_refund_only_moves_callers_funds() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let alice = s.funded_actor(units(10));
    let bob = s.funded_actor(units(15));
    let id = s.create(&creator, units(30));

    s.client.contribute(&alice, &id, &units(10));
    s.client.contribute(&bob, &id, &units(15));
    s.client.archive_project(&creator, &id);

    s.client.refund(&alice, &id);

    assert_eq!(s.token.balance(&alice), units(10));
    assert_eq!(s.token.balance(&bob), 0);
    assert_eq!(s.client.contribution_for(&bob, &id), units(15));

    let project = s.client.get_project(&id);
    assert_eq!(project.funding_amount, units(15));
    invariants::assert_funding_matches_contributions(&s.client, &project, &[alice, bob]);
    invariants::assert_escrow_covers_funding(
        s.token.balance(&s.client.address),
        &invariants::all_projects(&s.client),
    );
}

#[test]
fn test_refund_leaves_other_projects_untouched() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let backer = s.funded_actor(units(30));
    let cancelled = s.create(&creator, units(30));
    let running = s.create(&creator, units(30));

    s.client.contribute(&backer, &cancelled, &units(10));
    s.client.contribute(&backer, &running, &units(20));
    s.client.archive_project(&creator, &cancelled);

    assert_eq!(s.client.refund(&backer, &cancelled), units(10));

    assert_eq!(s.client.contribution_for(&backer, &running), units(20));
    assert_eq!(s.client.get_project(&running).funding_amount, units(20));
    assert_eq!(s.token.balance(&backer), units(10));
}

// ── Withdrawals ──────────────────────────────────────────────────────

#[test]
fn test_beneficiary_can_withdraw_successful_project() {
    let s = setup();
    let creator = s.funded_actor(units(500));
    let id = s.create(&creator, units(30));

    s.client.contribute(&creator, &id, &units(500));
    assert_eq!(s.token.balance(&creator), 0);

    s.client.withdraw(&creator, &id);

    let project = s.client.get_project(&id);
    assert_eq!(s.token.balance(&creator), units(500));
    assert_eq!(s.token.balance(&s.client.address), 0);
    assert_eq!(project.funding_amount, 0);
    assert_eq!(project.status, ProjectStatus::Done);
    invariants::assert_all_project_invariants(&project);
}

#[test]
fn test_withdraw_settles_every_contribution() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let alice = s.funded_actor(units(20));
    let bob = s.funded_actor(units(20));
    let id = s.create(&creator, units(30));

    s.client.contribute(&alice, &id, &units(10));
    s.client.contribute(&bob, &id, &units(20));
    s.client.withdraw(&creator, &id);

    assert_eq!(s.token.balance(&creator), units(30));
    assert_eq!(s.client.get_contribution(&alice, &0).amount_funded, 0);
    assert_eq!(s.client.get_contribution(&bob, &0).amount_funded, 0);

    let project = s.client.get_project(&id);
    invariants::assert_funding_matches_contributions(&s.client, &project, &[alice, bob]);
}

/// Withdraw a project backed by `backers` distinct contributors and return
/// the `(read_entries, write_entries)` of the withdrawal.
fn withdraw_footprint(backers: i128) -> (u32, u32) {
    let s = setup();
    let creator = Address::generate(&s.env);
    let id = s.create(&creator, units(backers));

    let mut funders = std::vec::Vec::new();
    for _ in 0..backers {
        let backer = s.funded_actor(units(1));
        s.client.contribute(&backer, &id, &units(1));
        funders.push(backer);
    }

    s.client.withdraw(&creator, &id);
    let resources = s.env.cost_estimate().resources();

    assert_eq!(s.token.balance(&creator), units(backers));
    for backer in &funders {
        assert_eq!(s.client.contribution_for(backer, &id), 0);
        assert_eq!(s.client.get_contribution(backer, &0).amount_funded, 0);
    }
    let project = s.client.get_project(&id);
    invariants::assert_funding_matches_contributions(&s.client, &project, &funders);

    (resources.read_entries, resources.write_entries)
}

#[test]
fn test_withdraw_footprint_does_not_grow_with_backers() {
    let few = withdraw_footprint(2);
    let many = withdraw_footprint(60);
    assert_eq!(few, many);
}

#[test]
fn test_non_owner_cannot_withdraw() {
    let s = setup();
    let creator = s.funded_actor(units(20));
    let other = s.funded_actor(units(20));
    let id = s.create(&creator, units(30));

    s.client.contribute(&creator, &id, &units(10));
    s.client.contribute(&other, &id, &units(20));

    assert_eq!(
        s.client.try_withdraw(&other, &id),
        Err(Ok(Error::NotOwnerOrNotFound))
    );
    assert_eq!(
        s.client.try_withdraw(&creator, &99),
        Err(Ok(Error::NotOwnerOrNotFound))
    );
    assert_eq!(s.client.get_project(&id).funding_amount, units(30));
}

#[test]
fn test_withdraw_before_goal_fails() {
    let s = setup();
    let creator = s.funded_actor(units(10));
    let id = s.create(&creator, units(30));

    s.client.contribute(&creator, &id, &units(10));

    assert_eq!(
        s.client.try_withdraw(&creator, &id),
        Err(Ok(Error::GoalNotMet))
    );
    assert_eq!(s.client.get_project(&id).funding_amount, units(10));
}

#[test]
fn test_withdraw_twice_fails() {
    let s = setup();
    let creator = s.funded_actor(units(40));
    let id = s.create(&creator, units(30));

    s.client.contribute(&creator, &id, &units(40));
    s.client.withdraw(&creator, &id);

    assert_eq!(
        s.client.try_withdraw(&creator, &id),
        Err(Ok(Error::GoalNotMet))
    );
    assert_eq!(s.token.balance(&creator), units(40));
}

#[test]
fn test_withdraw_then_archive_scenario() {
    let s = setup();
    let creator = s.funded_actor(units(400));
    let id = s.create(&creator, units(300));

    s.client.contribute(&creator, &id, &units(400));
    s.client.withdraw(&creator, &id);
    assert_eq!(s.client.get_project(&id).funding_amount, 0);

    assert_eq!(
        s.client.try_archive_project(&creator, &id),
        Err(Ok(Error::ProjectDone))
    );
}

#[test]
fn test_archived_funded_project_partial_refund_blocks_withdraw() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let alice = s.funded_actor(units(20));
    let bob = s.funded_actor(units(20));
    let id = s.create(&creator, units(30));

    s.client.contribute(&alice, &id, &units(15));
    s.client.contribute(&bob, &id, &units(20));
    s.client.archive_project(&creator, &id);

    s.client.refund(&alice, &id);
    assert_eq!(
        s.client.try_withdraw(&creator, &id),
        Err(Ok(Error::GoalNotMet))
    );

    assert_eq!(s.client.refund(&bob, &id), units(20));
    assert_eq!(s.client.get_project(&id).funding_amount, 0);
}
