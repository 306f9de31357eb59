//! Project lifecycle: creation, archiving, and the eligibility predicates
//! shared by the other operations.

use soroban_sdk::{Address, Env, String};

use crate::events::{self, ProjectArchived, ProjectCreated};
use crate::storage;
use crate::types::{Project, ProjectConfig, ProjectState, ProjectStatus};
use crate::Error;

/// Fundraising window, counted from the creation timestamp.
pub const FUNDING_DURATION_SECS: u64 = 30 * 24 * 60 * 60;

pub fn create_project(
    env: &Env,
    creator: Address,
    title: String,
    funding_goal: i128,
) -> Result<u64, Error> {
    creator.require_auth();

    if funding_goal <= 0 {
        return Err(Error::InvalidGoal);
    }

    let id = storage::get_and_increment_project_id(env);
    let config = ProjectConfig {
        id,
        title: title.clone(),
        funding_goal,
        beneficiary: creator.clone(),
        deadline: env.ledger().timestamp() + FUNDING_DURATION_SECS,
    };
    let state = ProjectState {
        funding_amount: 0,
        status: ProjectStatus::Active,
    };
    storage::save_project(env, &config, &state);

    events::emit_project_created(
        env,
        ProjectCreated {
            creator: creator.clone(),
            title,
            project_id: id,
            funding_goal,
            beneficiary: creator,
            status: ProjectStatus::Active,
        },
    );

    Ok(id)
}

pub fn archive_project(env: &Env, caller: Address, project_id: u64) -> Result<(), Error> {
    caller.require_auth();

    let config = load_owned_config(env, &caller, project_id)?;
    let mut state =
        storage::load_project_state(env, project_id).ok_or(Error::NotOwnerOrNotFound)?;

    match state.status {
        ProjectStatus::Active => {}
        ProjectStatus::Archived => return Err(Error::AlreadyArchived),
        ProjectStatus::Done => return Err(Error::ProjectDone),
    }

    state.status = ProjectStatus::Archived;
    storage::save_project_state(env, project_id, &state);

    events::emit_project_archived(
        env,
        ProjectArchived {
            project_id,
            beneficiary: config.beneficiary,
        },
    );
    Ok(())
}

pub fn get_project(env: &Env, project_id: u64) -> Result<Project, Error> {
    let (config, state) = load_parts(env, project_id)?;
    Ok(Project {
        id: config.id,
        title: config.title,
        funding_goal: config.funding_goal,
        funding_amount: state.funding_amount,
        beneficiary: config.beneficiary,
        deadline: config.deadline,
        status: state.status,
    })
}

pub fn is_refundable(env: &Env, project_id: u64) -> Result<bool, Error> {
    let (config, state) = load_parts(env, project_id)?;
    Ok(refund_eligible(env, &config, &state))
}

/// Load both halves of a project, or `ProjectNotFound`.
pub(crate) fn load_parts(env: &Env, project_id: u64) -> Result<(ProjectConfig, ProjectState), Error> {
    let config = storage::load_project_config(env, project_id).ok_or(Error::ProjectNotFound)?;
    let state = storage::load_project_state(env, project_id).ok_or(Error::ProjectNotFound)?;
    Ok((config, state))
}

/// Load the config of a project owned by `caller`.
///
/// A missing project and a foreign project yield the same error.
pub(crate) fn load_owned_config(
    env: &Env,
    caller: &Address,
    project_id: u64,
) -> Result<ProjectConfig, Error> {
    match storage::load_project_config(env, project_id) {
        Some(config) if config.beneficiary == *caller => Ok(config),
        _ => Err(Error::NotOwnerOrNotFound),
    }
}

/// Archived projects are always refundable. Active ones only once the
/// deadline has passed without reaching the goal.
pub(crate) fn refund_eligible(env: &Env, config: &ProjectConfig, state: &ProjectState) -> bool {
    match state.status {
        ProjectStatus::Archived => true,
        ProjectStatus::Active => {
            env.ledger().timestamp() > config.deadline && !state.goal_met(config.funding_goal)
        }
        ProjectStatus::Done => false,
    }
}
