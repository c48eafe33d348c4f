use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use kube::api::Api;
use kube::runtime::controller::Action;
use kube::runtime::{Controller, watcher};
use kube::{Client, ResourceExt};
use tracing::{debug, error, info, instrument};

use super::pass::{Assembled, PassKey, StatusSource, run_pass};
use super::{ControllerContext, ReconcileErr, error_policy};
use crate::markers::{self, APP_LABEL, OwnershipMarker, RevisionNumber};
use crate::snapshot::{self, workload_snapshot};
use crate::status::{
    DeploymentObservation, PodSnapshot, aggregate, assemble_deployment,
    default_probes,
};

/// An app that runs as a plain apps/v1 Deployment.
pub struct DeploymentSource {
    client: Client,
}

pub struct DeploymentSnapshot {
    app: String,
    observation: DeploymentObservation,
    pods: Vec<PodSnapshot>,
    observed_at: DateTime<Utc>,
}

impl DeploymentSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn app_name(d: &Deployment) -> String {
    match markers::deployment_name(&d.metadata) {
        "" => d.name_any(),
        app => app.to_string(),
    }
}

#[async_trait]
impl StatusSource for DeploymentSource {
    type Snapshot = DeploymentSnapshot;

    async fn fetch(&self, key: &PassKey) -> Result<Option<DeploymentSnapshot>, ReconcileErr> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), &key.namespace);
        let Some(d) = api.get_opt(&key.name).await? else {
            debug!("deployment not found");
            return Ok(None);
        };
        let app = app_name(&d);
        let pods = snapshot::list_app_pods(&self.client, &key.namespace, &app).await?;
        Ok(Some(DeploymentSnapshot {
            observation: DeploymentObservation {
                workload: workload_snapshot(&d),
                revision_number: RevisionNumber::from_meta(&d.metadata),
                rollout_revision: markers::rollout_revision(&d.metadata),
            },
            app,
            pods,
            observed_at: Utc::now(),
        }))
    }

    fn assemble(&self, snapshot: &DeploymentSnapshot) -> Result<Assembled, ReconcileErr> {
        let problems = aggregate(&snapshot.pods, &default_probes(snapshot.observed_at));
        let status = assemble_deployment(&snapshot.observation, problems)?;
        Ok(Assembled {
            name: snapshot.app.clone(),
            status,
        })
    }
}

#[instrument(skip_all, fields(ns = %obj.namespace().unwrap_or_default(), name = %obj.name_any()))]
async fn reconcile(
    obj: Arc<Deployment>,
    ctx: Arc<ControllerContext>,
) -> Result<Action, ReconcileErr> {
    // Knative owns its Deployments; those are reported per revision.
    if !OwnershipMarker::from_meta(&obj.metadata).present
        || markers::configuration_name(&obj.metadata).is_some()
    {
        return Ok(Action::await_change());
    }
    let ns = obj
        .namespace()
        .ok_or_else(|| super::into_internal("deployment has no namespace"))?;
    let key = PassKey::new(ns, obj.name_any());
    let source = DeploymentSource::new(ctx.client.clone());
    run_pass(&source, ctx.sink.as_ref(), &ctx.cfg.environment, &key).await?;
    Ok(Action::await_change())
}

pub async fn run_controller(ctx: Arc<ControllerContext>) -> anyhow::Result<()> {
    let api: Api<Deployment> = Api::all(ctx.client.clone());
    info!("starting deployment controller");
    Controller::new(api, watcher::Config::default().labels(APP_LABEL))
        .run(reconcile, error_policy, ctx)
        .for_each(|res| async move {
            match res {
                Ok((obj, action)) => debug!(%obj, ?action, "reconciled"),
                Err(e) => error!(error = ?e, "reconcile error"),
            }
        })
        .await;
    Ok(())
}
