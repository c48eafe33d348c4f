//! Status classification engine: pure functions from observed snapshots to
//! the status vocabulary reported to the status server.

pub mod assemble;
pub mod condition;
pub mod observed;
pub mod probes;
pub mod problems;
pub mod revision;
pub mod rollout;

#[cfg(test)]
mod revision_tests;

pub use assemble::{
    AssembleError, DeploymentObservation, KnativeObservation, RevisionObservation,
    assemble_deployment, assemble_knative,
};
pub use condition::{Condition, Truth};
pub use observed::*;
pub use probes::{ProblemProbe, default_probes};
pub use problems::{ProblemSet, aggregate};
pub use revision::{RevisionState, classify_revision, fold_rollout};
pub use rollout::{RolloutState, classify_rollout};
