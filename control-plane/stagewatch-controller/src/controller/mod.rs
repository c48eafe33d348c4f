pub mod deployment;
pub mod domain;
pub mod knative;
pub mod pass;


use std::fmt::Display;
use std::sync::Arc;

use kube::Client;
use kube::runtime::controller::Action;
use tracing::warn;

use crate::config::ControllerConfig;
use crate::sink::{SinkError, StatusSink};
use crate::status::AssembleError;

pub use pass::{Assembled, PassKey, PassOutcome, StatusSource, run_pass};

#[derive(thiserror::Error, Debug)]
pub enum ReconcileErr {
    #[error("observe error: {0}")]
    Observe(#[from] kube::Error),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("assemble error: {0}")]
    Assemble(#[from] AssembleError),
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Clone)]
pub struct ControllerContext {
    pub client: Client,
    pub cfg: ControllerConfig,
    pub sink: Arc<dyn StatusSink>,
}

fn into_internal<E: Display>(e: E) -> ReconcileErr {
    ReconcileErr::Internal(e.to_string())
}

/// Requeue every failed pass after the configured delay; the controller
/// runtime owns the retry, nothing loops locally.
fn error_policy<K>(
    _obj: Arc<K>,
    error: &ReconcileErr,
    ctx: Arc<ControllerContext>,
) -> Action {
    warn!(error = %error, "reconcile failed; requeueing");
    Action::requeue(ctx.cfg.requeue_delay())
}
