use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{self as corev1, Pod};
use kube::ResourceExt;

use crate::status::{
    Condition, ContainerImage, ContainerSnapshot, ContainerState, PodPhase,
    PodSnapshot, Truth, WorkloadSnapshot,
};

pub(crate) fn condition(
    type_: &str,
    status: &str,
    reason: Option<&String>,
    message: Option<&String>,
) -> Condition {
    Condition {
        type_: type_.to_string(),
        truth: Truth::parse(status),
        reason: reason.cloned().unwrap_or_default(),
        message: message.cloned().unwrap_or_default(),
    }
}

fn container_state(state: Option<&corev1::ContainerState>) -> ContainerState {
    let Some(state) = state else {
        return ContainerState::Unset;
    };
    if let Some(w) = &state.waiting {
        return ContainerState::Waiting {
            reason: w.reason.clone().unwrap_or_default(),
            message: w.message.clone().unwrap_or_default(),
        };
    }
    if let Some(r) = &state.running {
        return ContainerState::Running {
            started_at: r.started_at.as_ref().map(|t| t.0),
        };
    }
    if state.terminated.is_some() {
        return ContainerState::Terminated;
    }
    ContainerState::Unset
}

pub fn pod_snapshot(pod: &Pod) -> PodSnapshot {
    let status = pod.status.as_ref();
    let phase = status
        .and_then(|s| s.phase.as_deref())
        .map(PodPhase::parse)
        .unwrap_or_default();
    let containers = status
        .and_then(|s| s.container_statuses.as_ref())
        .map(|list| {
            list.iter()
                .map(|cs| ContainerSnapshot {
                    name: cs.name.clone(),
                    ready: cs.ready,
                    state: container_state(cs.state.as_ref()),
                })
                .collect()
        })
        .unwrap_or_default();
    PodSnapshot {
        name: pod.name_any(),
        phase,
        containers,
    }
}

pub fn workload_snapshot(d: &Deployment) -> WorkloadSnapshot {
    let spec = d.spec.as_ref();
    let status = d.status.as_ref();
    let conditions = status
        .and_then(|s| s.conditions.as_ref())
        .map(|list| {
            list.iter()
                .map(|c| {
                    condition(&c.type_, &c.status, c.reason.as_ref(), c.message.as_ref())
                })
                .collect()
        })
        .unwrap_or_default();
    let containers = spec
        .and_then(|s| s.template.spec.as_ref())
        .map(|ps| {
            ps.containers
                .iter()
                .map(|c| ContainerImage {
                    name: c.name.clone(),
                    image: c.image.clone().unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    WorkloadSnapshot {
        name: d.name_any(),
        generation: d.metadata.generation.unwrap_or(0),
        observed_generation: status.and_then(|s| s.observed_generation).unwrap_or(0),
        // apps/v1 defaults spec.replicas to 1
        desired_replicas: spec.and_then(|s| s.replicas).unwrap_or(1),
        updated_replicas: status.and_then(|s| s.updated_replicas).unwrap_or(0),
        total_replicas: status.and_then(|s| s.replicas).unwrap_or(0),
        available_replicas: status.and_then(|s| s.available_replicas).unwrap_or(0),
        conditions,
        containers,
    }
}
