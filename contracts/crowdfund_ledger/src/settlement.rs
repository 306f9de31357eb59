//! Fund movement out of escrow: withdrawal by the beneficiary of a funded
//! project, and refunds to contributors of a failed or cancelled one.
//!
//! Both operations call the token contract first and commit ledger state
//! afterwards. A failed transfer traps the invocation, so nothing is written.

use soroban_sdk::{token, Address, Env};

use crate::events::{self, ContributionRefunded, FundsWithdrawn};
use crate::project;
use crate::storage;
use crate::types::ProjectStatus;
use crate::Error;

pub fn withdraw(env: &Env, caller: Address, project_id: u64) -> Result<(), Error> {
    caller.require_auth();

    let config = project::load_owned_config(env, &caller, project_id)?;
    let mut state =
        storage::load_project_state(env, project_id).ok_or(Error::NotOwnerOrNotFound)?;

    // A withdrawn project holds nothing, so it falls through here as well.
    if !state.goal_met(config.funding_goal) {
        return Err(Error::GoalNotMet);
    }

    let amount = state.funding_amount;
    let token_client = token::Client::new(env, &storage::get_token(env));
    token_client.transfer(&env.current_contract_address(), &config.beneficiary, &amount);

    state.funding_amount = 0;
    state.status = ProjectStatus::Done;
    storage::save_project_state(env, project_id, &state);

    events::emit_funds_withdrawn(
        env,
        FundsWithdrawn {
            project_id,
            beneficiary: config.beneficiary,
            amount,
        },
    );
    Ok(())
}

pub fn refund(env: &Env, contributor: Address, project_id: u64) -> Result<i128, Error> {
    contributor.require_auth();

    let (config, mut state) = project::load_parts(env, project_id)?;
    if !project::refund_eligible(env, &config, &state) {
        return Err(Error::NotRefundableNow);
    }

    let amount = storage::contribution_for(env, &contributor, project_id);
    if amount == 0 {
        return Ok(0);
    }

    let token_client = token::Client::new(env, &storage::get_token(env));
    token_client.transfer(&env.current_contract_address(), &contributor, &amount);

    storage::zero_contribution(env, &contributor, project_id);
    state.funding_amount -= amount;
    storage::save_project_state(env, project_id, &state);

    events::emit_contribution_refunded(
        env,
        ContributionRefunded {
            project_id,
            contributor,
            amount,
        },
    );
    Ok(amount)
}
