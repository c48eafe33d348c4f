use serde::{Deserialize, Serialize};

/// Coarse state of a workload rollout as reported to the status server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RolloutStatus {
    Unknown,
    InProgress,
    Failed,
    Complete,
}

impl Default for RolloutStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for RolloutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RolloutStatus::Unknown => write!(f, "Unknown"),
            RolloutStatus::InProgress => write!(f, "InProgress"),
            RolloutStatus::Failed => write!(f, "Failed"),
            RolloutStatus::Complete => write!(f, "Complete"),
        }
    }
}

/// Coarse state of a single revision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RevisionStatus {
    Waiting,
    Unknown,
    Ready,
    Unhealthy,
}

impl Default for RevisionStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for RevisionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevisionStatus::Waiting => write!(f, "Waiting"),
            RevisionStatus::Unknown => write!(f, "Unknown"),
            RevisionStatus::Ready => write!(f, "Ready"),
            RevisionStatus::Unhealthy => write!(f, "Unhealthy"),
        }
    }
}
