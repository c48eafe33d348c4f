use stagewatch_models::RolloutStatus;

use super::condition::find_condition;
use super::observed::WorkloadSnapshot;

/// Reason set on the Progressing condition once a rollout exceeds its
/// progress deadline.
pub const TIMED_OUT_REASON: &str = "ProgressDeadlineExceeded";

pub const PROGRESSING_CONDITION: &str = "Progressing";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RolloutState {
    pub status: RolloutStatus,
    pub reason: String,
}

impl RolloutState {
    fn new(status: RolloutStatus, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(RolloutStatus::Unknown, "")
    }
}

/// Classify a workload rollout. Checks run in a fixed order and the first
/// applicable one wins; counters are never read from a stale observation.
pub fn classify_rollout(workload: &WorkloadSnapshot) -> RolloutState {
    if workload.observed_generation < workload.generation {
        return RolloutState::new(
            RolloutStatus::InProgress,
            "Waiting for deployment details",
        );
    }

    if let Some(cond) = find_condition(&workload.conditions, PROGRESSING_CONDITION)
    {
        if !cond.is_true() && cond.reason == TIMED_OUT_REASON {
            return RolloutState::new(
                RolloutStatus::Failed,
                "Deployment timed out",
            );
        }
    }

    let desired = workload.desired_replicas;
    let updated = workload.updated_replicas;
    let total = workload.total_replicas;
    let available = workload.available_replicas;

    if updated < desired {
        return RolloutState::new(
            RolloutStatus::InProgress,
            format!("{}/{} new replicas have been updated", updated, desired),
        );
    }
    if total > updated {
        return RolloutState::new(
            RolloutStatus::InProgress,
            format!("{} old replicas are pending termination", total - updated),
        );
    }
    if available < updated {
        return RolloutState::new(
            RolloutStatus::InProgress,
            format!("{}/{} updated replicas are available", available, updated),
        );
    }

    RolloutState::new(RolloutStatus::Complete, "Successfully rolled out")
}
