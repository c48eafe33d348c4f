use stagewatch_models::{
    CompositeStatus, RevisionStatus, RevisionStatusEntry, TrafficEntry,
};
use thiserror::Error;

use super::condition::find_condition;
use super::observed::{ContainerImage, RevisionSnapshot, WorkloadSnapshot};
use super::problems::ProblemSet;
use super::revision::{RevisionState, classify_revision, fold_rollout};
use super::rollout::{RolloutState, classify_rollout};
use crate::markers::MarkerError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    #[error("unable to find a container matching the deployment {container:?} in {owner}")]
    ContainerNotFound { owner: String, container: String },
    #[error("revision number of {object}: {source}")]
    Marker {
        object: String,
        #[source]
        source: MarkerError,
    },
}

/// A Knative revision together with the Deployment that runs it, if any.
#[derive(Clone, Debug)]
pub struct RevisionObservation {
    pub revision: RevisionSnapshot,
    pub workload: Option<WorkloadSnapshot>,
}

/// Everything read for one Knative Configuration/Route pair.
#[derive(Clone, Debug)]
pub struct KnativeObservation {
    pub name: String,
    pub revision_number: Result<i64, MarkerError>,
    pub latest_created_revision_name: String,
    pub latest_ready_revision_name: String,
    pub revisions: Vec<RevisionObservation>,
    pub traffic: Vec<TrafficEntry>,
}

/// A plain Deployment with its markers already read.
#[derive(Clone, Debug)]
pub struct DeploymentObservation {
    pub workload: WorkloadSnapshot,
    pub revision_number: Result<i64, MarkerError>,
    pub rollout_revision: i64,
}

/// Image of the container named `container`.
pub fn resolve_image(
    owner: &str,
    containers: &[ContainerImage],
    container: &str,
) -> Result<String, AssembleError> {
    containers
        .iter()
        .find(|c| c.name == container)
        .map(|c| c.image.clone())
        .ok_or_else(|| AssembleError::ContainerNotFound {
            owner: owner.to_string(),
            container: container.to_string(),
        })
}

fn revision_number(
    object: &str,
    value: &Result<i64, MarkerError>,
) -> Result<i64, AssembleError> {
    value.clone().map_err(|source| AssembleError::Marker {
        object: object.to_string(),
        source,
    })
}

fn revision_entry(obs: &RevisionObservation) -> Result<RevisionStatusEntry, AssembleError> {
    let rev = &obs.revision;
    let docker_image = resolve_image(&rev.name, &rev.containers, &rev.workload_name)?;
    let revision_number = revision_number(&rev.name, &rev.revision_number)?;

    let mut state = classify_revision(rev);
    let mut available_replicas = 0;
    if let Some(workload) = &obs.workload {
        state = fold_rollout(state, &classify_rollout(workload));
        available_replicas = workload.available_replicas;
    }

    Ok(RevisionStatusEntry {
        name: rev.name.clone(),
        docker_image,
        revision_number,
        available_replicas,
        status: state.status,
        reason: state.reason,
    })
}

/// Build the status of a Knative app. Fails without a partial result if any
/// revision lacks its app container or a readable revision number.
pub fn assemble_knative(
    obs: &KnativeObservation,
    problems: ProblemSet,
) -> Result<CompositeStatus, AssembleError> {
    let observed_revision_number = revision_number(&obs.name, &obs.revision_number)?;

    let revisions = obs
        .revisions
        .iter()
        .map(revision_entry)
        .collect::<Result<Vec<_>, _>>()?;

    let rollout = obs
        .revisions
        .iter()
        .find(|r| r.revision.name == obs.latest_created_revision_name)
        .and_then(|r| r.workload.as_ref())
        .map(classify_rollout)
        .unwrap_or_else(RolloutState::unknown);

    Ok(CompositeStatus {
        observed_revision_number,
        rollout_status: rollout.status,
        rollout_reason: rollout.reason,
        rollout_revision: None,
        docker_image: None,
        latest_created_revision_name: obs.latest_created_revision_name.clone(),
        latest_ready_revision_name: obs.latest_ready_revision_name.clone(),
        revisions,
        traffic: obs.traffic.clone(),
        problems: problems.into_sorted_vec(),
    })
}

// Deployments have no revision conditions of their own; Available stands in
// for Ready.
fn deployment_state(workload: &WorkloadSnapshot) -> RevisionState {
    let base = match find_condition(&workload.conditions, "Available") {
        Some(c) if c.is_true() => RevisionState {
            status: RevisionStatus::Ready,
            reason: String::new(),
        },
        Some(c) if c.is_false() => RevisionState {
            status: RevisionStatus::Unhealthy,
            reason: c.message.clone(),
        },
        Some(c) => RevisionState {
            status: RevisionStatus::Unknown,
            reason: c.message.clone(),
        },
        None => RevisionState {
            status: RevisionStatus::Unknown,
            reason: String::new(),
        },
    };
    fold_rollout(base, &classify_rollout(workload))
}

/// Build the status of an app that runs as a plain Deployment.
pub fn assemble_deployment(
    obs: &DeploymentObservation,
    problems: ProblemSet,
) -> Result<CompositeStatus, AssembleError> {
    let workload = &obs.workload;
    let observed_revision_number = revision_number(&workload.name, &obs.revision_number)?;
    let docker_image = resolve_image(&workload.name, &workload.containers, &workload.name)?;
    let rollout = classify_rollout(workload);
    let state = deployment_state(workload);

    let latest_ready_revision_name = if state.status == RevisionStatus::Ready {
        workload.name.clone()
    } else {
        String::new()
    };

    Ok(CompositeStatus {
        observed_revision_number,
        rollout_status: rollout.status,
        rollout_reason: rollout.reason,
        rollout_revision: Some(obs.rollout_revision),
        docker_image: Some(docker_image.clone()),
        latest_created_revision_name: workload.name.clone(),
        latest_ready_revision_name,
        revisions: vec![RevisionStatusEntry {
            name: workload.name.clone(),
            docker_image,
            revision_number: observed_revision_number,
            available_replicas: workload.available_replicas,
            status: state.status,
            reason: state.reason,
        }],
        traffic: vec![],
        problems: problems.into_sorted_vec(),
    })
}
