//! # Types
//!
//! Shared data structures used across all modules of the crowdfund ledger.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Project` is internally stored as two separate ledger entries:
//!
//! - [`ProjectConfig`] — written once at creation; never mutated.
//! - [`ProjectState`] — written on every contribution, archive, withdrawal
//!   and refund.
//!
//! The public API exposes the reconstructed [`Project`] struct.
//!
//! ### Status as a Finite-State Machine
//!
//! [`ProjectStatus`] is a stored tag with forward-only transitions:
//!
//! ```text
//! Active ──► Archived ──► Done
//!   └────────────────────►┘
//! ```
//!
//! `Done` is only reached through a successful withdrawal. Whether the goal
//! has been met is never stored; it is computed from `funding_amount` and
//! `funding_goal` (see [`ProjectState::goal_met`]).

use soroban_sdk::{contracttype, Address, String};

/// Lifecycle status of a project.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProjectStatus {
    /// Accepting contributions until the deadline or the goal is met.
    Active,
    /// Cancelled by the beneficiary; contributors may reclaim their funds.
    Archived,
    /// Funds withdrawn by the beneficiary. Terminal.
    Done,
}

/// Immutable project configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    pub id: u64,
    pub title: String,
    pub funding_goal: i128,
    pub beneficiary: Address,
    pub deadline: u64,
}

/// Mutable project state.
///
/// Kept small so that frequent writes (contributions, refunds) are cheap.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectState {
    pub funding_amount: i128,
    pub status: ProjectStatus,
}

impl ProjectState {
    /// `true` once the outstanding amount has reached the goal.
    pub fn goal_met(&self, funding_goal: i128) -> bool {
        self.funding_amount >= funding_goal
    }
}

/// Full on-chain representation of a funding project.
///
/// Used as the public API return type; reconstructed internally from
/// the split `ProjectConfig` + `ProjectState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    /// Unique identifier (auto-incremented from 0).
    pub id: u64,
    /// Free-form campaign title.
    pub title: String,
    /// Target amount, in the token's smallest unit.
    pub funding_goal: i128,
    /// Sum of contributions that are still held in escrow.
    pub funding_amount: i128,
    /// Creator of the project; the only address that may archive or withdraw.
    pub beneficiary: Address,
    /// Ledger timestamp after which contributions are refused.
    pub deadline: u64,
    /// Current lifecycle status.
    pub status: ProjectStatus,
}

/// One contributor's stake in one project.
///
/// A contributor holds at most one entry per project; repeated contributions
/// grow `amount_funded`. Entries are zeroed on refund and never removed.
/// Once the project is withdrawn its entries are reported as 0.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contribution {
    pub project_id: u64,
    /// Amount owed back to the contributor if the project is refunded.
    pub amount_funded: i128,
}
