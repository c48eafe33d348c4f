use chrono::{DateTime, Utc};

use super::condition::Condition;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    #[default]
    Unknown,
}

impl PodPhase {
    pub fn parse(s: &str) -> Self {
        match s {
            "Pending" => PodPhase::Pending,
            "Running" => PodPhase::Running,
            "Succeeded" => PodPhase::Succeeded,
            "Failed" => PodPhase::Failed,
            _ => PodPhase::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ContainerState {
    Waiting {
        reason: String,
        message: String,
    },
    Running {
        started_at: Option<DateTime<Utc>>,
    },
    Terminated,
    /// The runtime has not reported a state yet.
    #[default]
    Unset,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ContainerSnapshot {
    pub name: String,
    pub ready: bool,
    pub state: ContainerState,
}

/// Runtime view of one pod at observation time.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PodSnapshot {
    pub name: String,
    pub phase: PodPhase,
    pub containers: Vec<ContainerSnapshot>,
}

/// A container declared in a workload or revision template.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ContainerImage {
    pub name: String,
    pub image: String,
}

/// Generation and replica counters of a workload (apps/v1 Deployment).
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct WorkloadSnapshot {
    pub name: String,
    pub generation: i64,
    pub observed_generation: i64,
    pub desired_replicas: i32,
    pub updated_replicas: i32,
    pub total_replicas: i32,
    pub available_replicas: i32,
    pub conditions: Vec<Condition>,
    pub containers: Vec<ContainerImage>,
}

/// Immutable revision as seen at observation time; only `conditions` and
/// `observed_generation` move as the runtime reports progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevisionSnapshot {
    pub name: String,
    /// Runtime observation counter; 0 until the runtime has looked at the revision.
    pub observed_generation: i64,
    /// Platform revision number carried on the revision annotation.
    pub revision_number: Result<i64, crate::markers::MarkerError>,
    /// Name of the app container, taken from the owning deployment label.
    pub workload_name: String,
    pub conditions: Vec<Condition>,
    pub containers: Vec<ContainerImage>,
}
