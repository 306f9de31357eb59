//! # Events
//!
//! Every successful state transition publishes exactly one event. Topics are
//! `(symbol, project_id)` so that off-chain consumers can filter per project;
//! the payload is one of the structs below.
//!
//! | Topic       | Payload                  | Emitted by        |
//! |-------------|--------------------------|-------------------|
//! | `created`   | [`ProjectCreated`]       | `create_project`  |
//! | `funded`    | [`ContributionMade`]     | `contribute`      |
//! | `archived`  | [`ProjectArchived`]      | `archive_project` |
//! | `withdrawn` | [`FundsWithdrawn`]       | `withdraw`        |
//! | `refunded`  | [`ContributionRefunded`] | `refund`          |

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

use crate::types::ProjectStatus;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectCreated {
    pub creator: Address,
    pub title: String,
    pub project_id: u64,
    pub funding_goal: i128,
    pub beneficiary: Address,
    pub status: ProjectStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionMade {
    pub project_id: u64,
    pub contributor: Address,
    pub amount: i128,
    /// Project total after this contribution.
    pub funding_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectArchived {
    pub project_id: u64,
    pub beneficiary: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsWithdrawn {
    pub project_id: u64,
    pub beneficiary: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionRefunded {
    pub project_id: u64,
    pub contributor: Address,
    pub amount: i128,
}

pub fn emit_project_created(env: &Env, event: ProjectCreated) {
    env.events()
        .publish((symbol_short!("created"), event.project_id), event);
}

pub fn emit_contribution_made(env: &Env, event: ContributionMade) {
    env.events()
        .publish((symbol_short!("funded"), event.project_id), event);
}

pub fn emit_project_archived(env: &Env, event: ProjectArchived) {
    env.events()
        .publish((symbol_short!("archived"), event.project_id), event);
}

pub fn emit_funds_withdrawn(env: &Env, event: FundsWithdrawn) {
    env.events()
        .publish((symbol_short!("withdrawn"), event.project_id), event);
}

pub fn emit_contribution_refunded(env: &Env, event: ContributionRefunded) {
    env.events()
        .publish((symbol_short!("refunded"), event.project_id), event);
}
