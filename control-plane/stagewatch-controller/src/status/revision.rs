use stagewatch_models::{RevisionStatus, RolloutStatus};

use super::condition::{Condition, find_condition};
use super::observed::RevisionSnapshot;
use super::rollout::RolloutState;

pub const DEPLOYING_REASON: &str = "Deploying";

const READY: &str = "Ready";
const CONTAINER_HEALTHY: &str = "ContainerHealthy";
const ACTIVE: &str = "Active";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevisionState {
    pub status: RevisionStatus,
    pub reason: String,
}

impl RevisionState {
    fn new(status: RevisionStatus, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }

    fn deploying() -> Self {
        Self::new(RevisionStatus::Waiting, DEPLOYING_REASON)
    }
}

/// Collapse a revision's conditions into one status.
///
/// A revision the runtime has not observed yet (observed generation 0) is
/// assumed to be deploying. Disqualifying conditions (`ContainerHealthy`
/// false, `Active` timed out) are looked for across the whole list before
/// `Ready` is consulted, so their position in the reported list does not
/// matter. Unrecognized condition types and reasons fall through.
pub fn classify_revision(revision: &RevisionSnapshot) -> RevisionState {
    if revision.observed_generation == 0 {
        return RevisionState::deploying();
    }
    classify_conditions(&revision.conditions)
}

fn classify_conditions(conditions: &[Condition]) -> RevisionState {
    if let Some(cond) = conditions
        .iter()
        .find(|c| c.type_ == CONTAINER_HEALTHY && c.is_false())
    {
        return RevisionState::new(RevisionStatus::Unhealthy, cond.message.clone());
    }

    if let Some(cond) = conditions
        .iter()
        .find(|c| c.type_ == ACTIVE && c.is_false() && c.reason == "TimedOut")
    {
        return RevisionState::new(
            RevisionStatus::Unhealthy,
            format!(
                "{} This is usually due to a failing health check",
                cond.message
            ),
        );
    }

    match find_condition(conditions, READY) {
        Some(ready) if ready.is_unknown() => {
            if ready.reason == DEPLOYING_REASON || ready.reason == "ResolvingDigests" {
                RevisionState::deploying()
            } else {
                RevisionState::new(RevisionStatus::Unknown, ready.message.clone())
            }
        }
        Some(ready) if ready.is_true() => RevisionState::new(RevisionStatus::Ready, ""),
        Some(ready) => {
            RevisionState::new(RevisionStatus::Unhealthy, ready.message.clone())
        }
        None => RevisionState::new(RevisionStatus::Unknown, ""),
    }
}

/// Fold the backing workload's rollout into a revision status. Only a
/// revision that is `Ready` or `Unknown` on its own is affected; a revision
/// already waiting or unhealthy keeps its own reason.
pub fn fold_rollout(state: RevisionState, rollout: &RolloutState) -> RevisionState {
    if !matches!(state.status, RevisionStatus::Ready | RevisionStatus::Unknown) {
        return state;
    }
    match rollout.status {
        RolloutStatus::InProgress => {
            RevisionState::new(RevisionStatus::Waiting, rollout.reason.clone())
        }
        RolloutStatus::Failed => {
            RevisionState::new(RevisionStatus::Unhealthy, rollout.reason.clone())
        }
        RolloutStatus::Complete | RolloutStatus::Unknown => state,
    }
}
