//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the ledger:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key              | Type      | Description                        |
//! |------------------|-----------|------------------------------------|
//! | `Token`          | `Address` | Escrow token fixed at deployment   |
//! | `ProjectCount`   | `u64`     | Auto-increment project ID counter  |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                     | Type                | Description                          |
//! |-------------------------|---------------------|--------------------------------------|
//! | `ProjConfig(id)`        | `ProjectConfig`     | Immutable project configuration      |
//! | `ProjState(id)`         | `ProjectState`      | Mutable project state                |
//! | `Contribution(addr,i)`  | `Contribution`      | `addr`'s `i`-th entry                |
//! | `ContributionCount(addr)` | `u32`             | Number of entries `addr` holds       |
//! | `ContribIndex(addr,id)` | `u32`               | Position of `addr`'s entry for `id`  |
//!
//! A contribution touches a fixed number of entries however many projects
//! or backers exist.
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//! Project entries must outlive the 30-day fundraising window by a wide
//! margin since refunds can be claimed long after the deadline.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{Contribution, ProjectConfig, ProjectState};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Token held in escrow (Instance).
    Token,
    /// Global auto-increment counter for project IDs (Instance).
    ProjectCount,
    /// Immutable project configuration keyed by ID (Persistent).
    ProjConfig(u64),
    /// Mutable project state keyed by ID (Persistent).
    ProjState(u64),
    /// One contribution entry of a contributor, by position (Persistent).
    Contribution(Address, u32),
    /// Number of entries a contributor holds (Persistent).
    ContributionCount(Address),
    /// Position of a contributor's entry for a given project (Persistent).
    ContribIndex(Address, u64),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn has_token(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Token)
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
    bump_instance(env);
}

/// Retrieve the escrow token.
/// Panics if called before the constructor ran, which the host prevents.
pub fn get_token(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .expect("token not set")
}

/// Atomically reads, increments, and stores the project counter.
/// Returns the ID to use for the *current* project (pre-increment value).
pub fn get_and_increment_project_id(env: &Env) -> u64 {
    bump_instance(env);
    let current = project_count(env);
    env.storage()
        .instance()
        .set(&DataKey::ProjectCount, &(current + 1));
    current
}

/// Number of projects created so far (also the next ID to be assigned).
pub fn project_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ProjectCount)
        .unwrap_or(0)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Save both the immutable config and initial mutable state for a new project.
pub fn save_project(env: &Env, config: &ProjectConfig, state: &ProjectState) {
    let config_key = DataKey::ProjConfig(config.id);
    let state_key = DataKey::ProjState(config.id);

    env.storage().persistent().set(&config_key, config);
    env.storage().persistent().set(&state_key, state);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
}

/// Load only the immutable project configuration.
pub fn load_project_config(env: &Env, id: u64) -> Option<ProjectConfig> {
    let key = DataKey::ProjConfig(id);
    let config = env.storage().persistent().get(&key);
    if config.is_some() {
        bump_persistent(env, &key);
    }
    config
}

/// Load only the mutable project state.
pub fn load_project_state(env: &Env, id: u64) -> Option<ProjectState> {
    let key = DataKey::ProjState(id);
    let state = env.storage().persistent().get(&key);
    if state.is_some() {
        bump_persistent(env, &key);
    }
    state
}

/// Save only the mutable project state.
pub fn save_project_state(env: &Env, id: u64, state: &ProjectState) {
    let key = DataKey::ProjState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

// ── Contribution Helpers ─────────────────────────────────────────────

/// Number of entries `contributor` holds.
pub fn contribution_count(env: &Env, contributor: &Address) -> u32 {
    let key = DataKey::ContributionCount(contributor.clone());
    match env.storage().persistent().get(&key) {
        Some(count) => {
            bump_persistent(env, &key);
            count
        }
        None => 0,
    }
}

/// `contributor`'s `index`-th entry, as stored.
pub fn load_contribution(env: &Env, contributor: &Address, index: u32) -> Option<Contribution> {
    let key = DataKey::Contribution(contributor.clone(), index);
    let entry = env.storage().persistent().get(&key);
    if entry.is_some() {
        bump_persistent(env, &key);
    }
    entry
}

fn save_contribution(env: &Env, contributor: &Address, index: u32, entry: &Contribution) {
    let key = DataKey::Contribution(contributor.clone(), index);
    env.storage().persistent().set(&key, entry);
    bump_persistent(env, &key);
}

/// Position of `contributor`'s entry for `project_id`, if one exists.
pub fn find_contribution_index(env: &Env, contributor: &Address, project_id: u64) -> Option<u32> {
    let key = DataKey::ContribIndex(contributor.clone(), project_id);
    let index = env.storage().persistent().get(&key);
    if index.is_some() {
        bump_persistent(env, &key);
    }
    index
}

/// Stored amount of `contributor`'s entry for `project_id` (0 when none).
pub fn contribution_for(env: &Env, contributor: &Address, project_id: u64) -> i128 {
    find_contribution_index(env, contributor, project_id)
        .and_then(|index| load_contribution(env, contributor, index))
        .map(|entry| entry.amount_funded)
        .unwrap_or(0)
}

/// Add `amount` to `contributor`'s entry for `project_id`, appending a new
/// entry on the first contribution. Returns the entry's new total.
pub fn add_contribution(env: &Env, contributor: &Address, project_id: u64, amount: i128) -> i128 {
    let existing = find_contribution_index(env, contributor, project_id)
        .and_then(|index| load_contribution(env, contributor, index).map(|entry| (index, entry)));

    match existing {
        Some((index, mut entry)) => {
            entry.amount_funded += amount;
            save_contribution(env, contributor, index, &entry);
            entry.amount_funded
        }
        None => {
            let index = contribution_count(env, contributor);
            save_contribution(
                env,
                contributor,
                index,
                &Contribution {
                    project_id,
                    amount_funded: amount,
                },
            );

            let count_key = DataKey::ContributionCount(contributor.clone());
            env.storage().persistent().set(&count_key, &(index + 1));
            bump_persistent(env, &count_key);

            let index_key = DataKey::ContribIndex(contributor.clone(), project_id);
            env.storage().persistent().set(&index_key, &index);
            bump_persistent(env, &index_key);
            amount
        }
    }
}

/// Zero `contributor`'s entry for `project_id`, keeping it in place.
pub fn zero_contribution(env: &Env, contributor: &Address, project_id: u64) {
    let Some(index) = find_contribution_index(env, contributor, project_id) else {
        return;
    };
    if let Some(mut entry) = load_contribution(env, contributor, index) {
        if entry.amount_funded != 0 {
            entry.amount_funded = 0;
            save_contribution(env, contributor, index, &entry);
        }
    }
}
