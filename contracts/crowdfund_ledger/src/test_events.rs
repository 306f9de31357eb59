extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    vec, Address, IntoVal, String, Symbol, TryIntoVal, Val,
};

use crate::test::{setup, units, Setup};
use crate::{
    ContributionMade, ContributionRefunded, FundsWithdrawn, ProjectArchived, ProjectCreated,
    ProjectStatus,
};

/// Return the topics and data of the most recent event, asserting it was
/// published by the ledger contract.
fn last_ledger_event(s: &Setup) -> (soroban_sdk::Vec<Val>, Val) {
    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");
    assert_eq!(last_event.0, s.client.address);
    (last_event.1, last_event.2)
}

fn expected_topics(s: &Setup, symbol: Symbol, project_id: u64) -> soroban_sdk::Vec<Val> {
    vec![&s.env, symbol.into_val(&s.env), project_id.into_val(&s.env)]
}

#[test]
fn test_project_created_event() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let title = String::from_str(&s.env, "Created A Project");
    let goal = 123i128;

    let id = s.client.create_project(&creator, &title, &goal);

    let (topics, data) = last_ledger_event(&s);
    assert_eq!(topics, expected_topics(&s, symbol_short!("created"), id));

    let event_data: ProjectCreated = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        event_data,
        ProjectCreated {
            creator: creator.clone(),
            title,
            project_id: 0,
            funding_goal: goal,
            beneficiary: creator,
            status: ProjectStatus::Active,
        }
    );
}

#[test]
fn test_contribution_made_event() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let backer = s.funded_actor(units(30));
    let id = s.create(&creator, units(100));

    s.client.contribute(&backer, &id, &units(10));
    s.client.contribute(&backer, &id, &units(20));

    let (topics, data) = last_ledger_event(&s);
    assert_eq!(topics, expected_topics(&s, symbol_short!("funded"), id));

    let event_data: ContributionMade = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        event_data,
        ContributionMade {
            project_id: id,
            contributor: backer,
            amount: units(20),
            funding_amount: units(30),
        }
    );
}

#[test]
fn test_project_archived_event() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let id = s.create(&creator, units(100));

    s.client.archive_project(&creator, &id);

    let (topics, data) = last_ledger_event(&s);
    assert_eq!(topics, expected_topics(&s, symbol_short!("archived"), id));

    let event_data: ProjectArchived = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        event_data,
        ProjectArchived {
            project_id: id,
            beneficiary: creator,
        }
    );
}

#[test]
fn test_funds_withdrawn_event() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let backer = s.funded_actor(units(40));
    let id = s.create(&creator, units(30));

    s.client.contribute(&backer, &id, &units(40));
    s.client.withdraw(&creator, &id);

    let (topics, data) = last_ledger_event(&s);
    assert_eq!(topics, expected_topics(&s, symbol_short!("withdrawn"), id));

    let event_data: FundsWithdrawn = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        event_data,
        FundsWithdrawn {
            project_id: id,
            beneficiary: creator,
            amount: units(40),
        }
    );
}

#[test]
fn test_contribution_refunded_event() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let backer = s.funded_actor(units(10));
    let id = s.create(&creator, units(30));

    s.client.contribute(&backer, &id, &units(10));
    s.client.archive_project(&creator, &id);
    s.client.refund(&backer, &id);

    let (topics, data) = last_ledger_event(&s);
    assert_eq!(topics, expected_topics(&s, symbol_short!("refunded"), id));

    let event_data: ContributionRefunded = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        event_data,
        ContributionRefunded {
            project_id: id,
            contributor: backer,
            amount: units(10),
        }
    );
}
