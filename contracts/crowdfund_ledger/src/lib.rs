//! # Crowdfund Ledger Contract
//!
//! Escrow-then-release-or-refund crowdfunding on Soroban. Creators open a
//! project with a funding goal and a 30-day window; anyone may contribute in
//! the contract's token; the outcome is either a withdrawal of everything
//! raised by the beneficiary (goal met) or per-contributor refunds (window
//! closed below goal, or project archived).
//!
//! | Phase        | Entry Point(s)                                            |
//! |--------------|-----------------------------------------------------------|
//! | Bootstrap    | `__constructor`                                           |
//! | Registration | [`CrowdfundLedger::create_project`]                       |
//! | Funding      | [`CrowdfundLedger::contribute`]                           |
//! | Cancellation | [`CrowdfundLedger::archive_project`]                      |
//! | Settlement   | [`CrowdfundLedger::withdraw`], [`CrowdfundLedger::refund`] |
//! | Queries      | `get_project`, `get_contribution`, `contribution_count`, `contribution_for`, `project_count`, `is_refundable`, `min_contribution_amount`, `token` |
//!
//! ## Architecture
//!
//! Lifecycle rules live in [`project`], contribution accounting in
//! [`contribution`], and fund movement in [`settlement`]. Storage access is
//! fully delegated to [`storage`]. This file contains only the public entry
//! points and the error taxonomy.
//!
//! ## Accounting invariant
//!
//! For every project, `funding_amount` equals the sum of `amount_funded`
//! over every contribution entry that references it. Only `withdraw` and
//! `refund` decrease it, each by exactly the amount transferred out.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, panic_with_error, Address, Env, String};

mod contribution;
mod events;
mod project;
mod settlement;
mod storage;
mod types;

#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_settlement;

pub use contribution::MIN_CONTRIBUTION_AMOUNT;
pub use events::{
    ContributionMade, ContributionRefunded, FundsWithdrawn, ProjectArchived, ProjectCreated,
};
pub use project::FUNDING_DURATION_SECS;
pub use types::{Contribution, Project, ProjectStatus};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    ProjectNotFound          = 1,
    // Archive and withdraw do not distinguish a missing project from a
    // foreign one.
    NotOwnerOrNotFound       = 2,
    ProjectNotActive         = 3,
    FundraisingOver          = 4,
    GoalAlreadyMet           = 5,
    BelowMinimumContribution = 6,
    AlreadyArchived          = 7,
    ProjectDone              = 8,
    GoalNotMet               = 9,
    NotRefundableNow         = 10,
    InvalidGoal              = 11,
    ContributionNotFound     = 12,
    AlreadyInitialized       = 13,
}

#[contract]
pub struct CrowdfundLedger;

#[contractimpl]
impl CrowdfundLedger {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Bind the ledger to the token it escrows. Runs once, at deployment.
    pub fn __constructor(env: Env, token: Address) {
        if storage::has_token(&env) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        storage::set_token(&env, &token);
    }

    // ─────────────────────────────────────────────────────────
    // Project lifecycle
    // ─────────────────────────────────────────────────────────

    /// Open a new project with `creator` as its beneficiary.
    ///
    /// The deadline is fixed at the current ledger timestamp plus
    /// [`FUNDING_DURATION_SECS`]. Fails with `InvalidGoal` unless
    /// `funding_goal` is positive.
    pub fn create_project(
        env: Env,
        creator: Address,
        title: String,
        funding_goal: i128,
    ) -> Result<u64, Error> {
        project::create_project(&env, creator, title, funding_goal)
    }

    /// Pledge `amount` of the escrow token to `project_id`.
    ///
    /// Checks, in order: project exists, is `Active`, deadline not passed,
    /// goal not yet met, `amount` at least [`MIN_CONTRIBUTION_AMOUNT`].
    pub fn contribute(
        env: Env,
        contributor: Address,
        project_id: u64,
        amount: i128,
    ) -> Result<(), Error> {
        contribution::contribute(&env, contributor, project_id, amount)
    }

    /// Cancel an active project. Only the beneficiary may archive; once
    /// archived, every contributor can reclaim their funds.
    pub fn archive_project(env: Env, caller: Address, project_id: u64) -> Result<(), Error> {
        project::archive_project(&env, caller, project_id)
    }

    // ─────────────────────────────────────────────────────────
    // Settlement
    // ─────────────────────────────────────────────────────────

    /// Release everything raised to the beneficiary once the goal is met.
    pub fn withdraw(env: Env, caller: Address, project_id: u64) -> Result<(), Error> {
        settlement::withdraw(&env, caller, project_id)
    }

    /// Return `contributor`'s outstanding stake in a refundable project.
    ///
    /// Returns the amount transferred back; 0 if nothing was owed.
    pub fn refund(env: Env, contributor: Address, project_id: u64) -> Result<i128, Error> {
        settlement::refund(&env, contributor, project_id)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Retrieve a project by its ID.
    pub fn get_project(env: Env, project_id: u64) -> Result<Project, Error> {
        project::get_project(&env, project_id)
    }

    /// Retrieve `contributor`'s `index`-th contribution entry.
    pub fn get_contribution(
        env: Env,
        contributor: Address,
        index: u32,
    ) -> Result<Contribution, Error> {
        contribution::get_contribution(&env, contributor, index)
    }

    /// Number of entries `contributor` holds (one per project funded).
    pub fn contribution_count(env: Env, contributor: Address) -> u32 {
        contribution::contribution_count(&env, contributor)
    }

    /// Amount `contributor` would get back from `project_id` on refund.
    pub fn contribution_for(env: Env, contributor: Address, project_id: u64) -> i128 {
        contribution::contribution_for(&env, contributor, project_id)
    }

    pub fn project_count(env: Env) -> u64 {
        storage::project_count(&env)
    }

    /// Whether `refund` would currently be accepted for `project_id`.
    pub fn is_refundable(env: Env, project_id: u64) -> Result<bool, Error> {
        project::is_refundable(&env, project_id)
    }

    pub fn min_contribution_amount(_env: Env) -> i128 {
        MIN_CONTRIBUTION_AMOUNT
    }

    pub fn token(env: Env) -> Address {
        storage::get_token(&env)
    }
}
