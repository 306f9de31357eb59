use soroban_sdk::{token, Address, Env};

use crate::events::{self, ContributionMade};
use crate::project;
use crate::storage;
use crate::types::{Contribution, ProjectStatus};
use crate::Error;

/// Smallest accepted contribution, in the token's smallest unit.
pub const MIN_CONTRIBUTION_AMOUNT: i128 = 10_000_000_000_000_000;

pub fn contribute(
    env: &Env,
    contributor: Address,
    project_id: u64,
    amount: i128,
) -> Result<(), Error> {
    contributor.require_auth();

    let (config, mut state) = project::load_parts(env, project_id)?;

    if state.status != ProjectStatus::Active {
        return Err(Error::ProjectNotActive);
    }
    if env.ledger().timestamp() > config.deadline {
        return Err(Error::FundraisingOver);
    }
    // Only an already-met goal blocks; the contribution that crosses the
    // goal is accepted in full.
    if state.goal_met(config.funding_goal) {
        return Err(Error::GoalAlreadyMet);
    }
    if amount < MIN_CONTRIBUTION_AMOUNT {
        return Err(Error::BelowMinimumContribution);
    }

    // Pull the funds into escrow before recording them.
    let token_client = token::Client::new(env, &storage::get_token(env));
    token_client.transfer(&contributor, &env.current_contract_address(), &amount);

    state.funding_amount += amount;
    storage::save_project_state(env, project_id, &state);
    storage::add_contribution(env, &contributor, project_id, amount);

    events::emit_contribution_made(
        env,
        ContributionMade {
            project_id,
            contributor,
            amount,
            funding_amount: state.funding_amount,
        },
    );
    Ok(())
}

pub fn get_contribution(env: &Env, contributor: Address, index: u32) -> Result<Contribution, Error> {
    let mut entry =
        storage::load_contribution(env, &contributor, index).ok_or(Error::ContributionNotFound)?;
    if released(env, entry.project_id) {
        entry.amount_funded = 0;
    }
    Ok(entry)
}

pub fn contribution_count(env: &Env, contributor: Address) -> u32 {
    storage::contribution_count(env, &contributor)
}

/// Amount `contributor` could still reclaim from `project_id`.
pub fn contribution_for(env: &Env, contributor: Address, project_id: u64) -> i128 {
    if released(env, project_id) {
        return 0;
    }
    storage::contribution_for(env, &contributor, project_id)
}

/// Withdrawn projects owe nothing to their backers.
fn released(env: &Env, project_id: u64) -> bool {
    storage::load_project_state(env, project_id)
        .is_some_and(|state| state.status == ProjectStatus::Done)
}
