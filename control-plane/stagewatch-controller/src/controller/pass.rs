use async_trait::async_trait;
use stagewatch_models::CompositeStatus;
use tracing::{error, info, instrument, warn};

use super::ReconcileErr;
use crate::sink::StatusSink;

/// Namespaced name of the object that triggered a pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassKey {
    pub namespace: String,
    pub name: String,
}

impl PassKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

/// A status ready to push, keyed by the deployment name the server knows.
#[derive(Clone, Debug, PartialEq)]
pub struct Assembled {
    pub name: String,
    pub status: CompositeStatus,
}

/// What one resource kind needs to provide to be reported.
#[async_trait]
pub trait StatusSource: Send + Sync {
    type Snapshot: Send + Sync;

    /// Read everything the pass needs. `None` when the object is gone.
    async fn fetch(&self, key: &PassKey) -> Result<Option<Self::Snapshot>, ReconcileErr>;

    fn assemble(&self, snapshot: &Self::Snapshot) -> Result<Assembled, ReconcileErr>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    Pushed { observed_revision: i64 },
    /// The server holds a newer observation; this pass yields.
    Conflict,
    /// The object was deleted between trigger and read.
    Gone,
}

/// Observe, classify, assemble and push one status.
///
/// A conflict from the status server ends the pass without error. Any
/// other push failure is returned so the controller runtime requeues.
#[instrument(skip_all, fields(ns = %key.namespace, name = %key.name, environment = %environment))]
pub async fn run_pass<S>(
    source: &S,
    sink: &dyn StatusSink,
    environment: &str,
    key: &PassKey,
) -> Result<PassOutcome, ReconcileErr>
where
    S: StatusSource + ?Sized,
{
    let Some(snapshot) = source.fetch(key).await? else {
        info!("resource not found; nothing to report");
        return Ok(PassOutcome::Gone);
    };

    let Assembled { name, status } = source.assemble(&snapshot)?;
    let observed_revision = status.observed_revision_number;

    match sink.push_status(&name, environment, &status).await {
        Ok(()) => {
            info!(%name, observed_revision, "saved deployment status");
            Ok(PassOutcome::Pushed { observed_revision })
        }
        Err(e) if e.is_conflict() => {
            warn!(%name, observed_revision, error = %e, "deployment status conflict; newer status already recorded");
            Ok(PassOutcome::Conflict)
        }
        Err(e) => {
            error!(%name, observed_revision, error = %e, "error saving deployment status");
            Err(e.into())
        }
    }
}
