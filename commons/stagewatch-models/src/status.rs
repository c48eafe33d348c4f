use serde::{Deserialize, Serialize};

use crate::enums::{RevisionStatus, RolloutStatus};

/// Status record pushed to the status server for one deployment in one
/// environment. Built fresh on every reconcile pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompositeStatus {
    pub observed_revision_number: i64,
    pub rollout_status: RolloutStatus,
    #[serde(default)]
    pub rollout_reason: String,
    /// Workload-level rollout revision (plain Deployments only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollout_revision: Option<i64>,
    /// Image of the app container (plain Deployments only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub latest_created_revision_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub latest_ready_revision_name: String,
    #[serde(default)]
    pub revisions: Vec<RevisionStatusEntry>,
    #[serde(default)]
    pub traffic: Vec<TrafficEntry>,
    #[serde(default)]
    pub problems: Vec<Problem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevisionStatusEntry {
    pub name: String,
    pub docker_image: String,
    pub revision_number: i64,
    pub available_replicas: i32,
    pub status: RevisionStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrafficEntry {
    pub revision_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// A deduplicated problem observed across instances.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Problem {
    pub message: String,
    pub count: u32,
}
