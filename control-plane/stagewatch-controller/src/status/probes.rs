use chrono::{DateTime, Duration, Utc};

use super::observed::{ContainerState, PodPhase, PodSnapshot};

/// Containers that are running but not ready for longer than this are
/// reported as failing their health check.
pub const DEFAULT_POD_READINESS_SECONDS: i64 = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PodProblem {
    pub message: String,
}

impl PodProblem {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Inspects one pod and reports at most one problem.
pub trait ProblemProbe: Send + Sync {
    fn get_problem(&self, pod: &PodSnapshot) -> Option<PodProblem>;
}

/// Running pod with a container stuck in CrashLoopBackOff.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrashLoopBackOffProbe;

impl ProblemProbe for CrashLoopBackOffProbe {
    fn get_problem(&self, pod: &PodSnapshot) -> Option<PodProblem> {
        if pod.phase != PodPhase::Running {
            return None;
        }
        pod.containers.iter().find_map(|c| match &c.state {
            ContainerState::Waiting { reason, message }
                if !c.ready && reason == "CrashLoopBackOff" =>
            {
                Some(PodProblem::new(format!("{}: {}", reason, message)))
            }
            _ => None,
        })
    }
}

/// Running pod with a container that started a while ago but never became
/// ready. Typically a readiness probe that keeps failing after rollout.
#[derive(Clone, Copy, Debug)]
pub struct HealthcheckProbe {
    now: DateTime<Utc>,
}

impl HealthcheckProbe {
    /// Probe that judges container age relative to `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl ProblemProbe for HealthcheckProbe {
    fn get_problem(&self, pod: &PodSnapshot) -> Option<PodProblem> {
        if pod.phase != PodPhase::Running {
            return None;
        }
        let threshold = Duration::seconds(DEFAULT_POD_READINESS_SECONDS);
        pod.containers.iter().find_map(|c| match &c.state {
            ContainerState::Running {
                started_at: Some(started_at),
            } if !c.ready && self.now - *started_at > threshold => {
                Some(PodProblem::new(format!(
                    "Container {:?} failing health check",
                    c.name
                )))
            }
            _ => None,
        })
    }
}

/// Pending pod with a container waiting for anything other than pod init.
#[derive(Clone, Copy, Debug, Default)]
pub struct WaitingProbe;

impl ProblemProbe for WaitingProbe {
    fn get_problem(&self, pod: &PodSnapshot) -> Option<PodProblem> {
        if pod.phase != PodPhase::Pending {
            return None;
        }
        pod.containers.iter().find_map(|c| match &c.state {
            ContainerState::Waiting { reason, message }
                if !c.ready && reason != "PodInitializing" =>
            {
                Some(PodProblem::new(format!(
                    "Container {:?} is waiting: {} ({})",
                    c.name, reason, message
                )))
            }
            _ => None,
        })
    }
}

/// The built-in probe set, evaluated against `now`.
pub fn default_probes(now: DateTime<Utc>) -> Vec<Box<dyn ProblemProbe>> {
    vec![
        Box::new(CrashLoopBackOffProbe),
        Box::new(HealthcheckProbe::at(now)),
        Box::new(WaitingProbe),
    ]
}
