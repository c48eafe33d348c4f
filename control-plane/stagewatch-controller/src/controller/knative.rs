use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use kube::api::Api;
use kube::core::{ApiResource, DynamicObject};
use kube::runtime::controller::Action;
use kube::runtime::reflector::ObjectRef;
use kube::runtime::{Controller, watcher};
use kube::{Client, ResourceExt};
use tracing::{debug, error, info, instrument};

use super::pass::{Assembled, PassKey, StatusSource, run_pass};
use super::{ControllerContext, ReconcileErr, error_policy};
use crate::markers::{self, APP_LABEL, OwnershipMarker, RevisionNumber};
use crate::snapshot::{
    self, configuration_resource, configuration_view, revision_snapshot,
    route_resource, route_traffic,
};
use crate::status::{
    KnativeObservation, PodSnapshot, RevisionObservation, aggregate,
    assemble_knative, default_probes,
};

/// A Knative app is one Configuration plus the Route of the same name.
pub struct KnativeSource {
    client: Client,
}

pub struct KnativeSnapshot {
    observation: KnativeObservation,
    pods: Vec<PodSnapshot>,
    observed_at: DateTime<Utc>,
}

impl KnativeSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusSource for KnativeSource {
    type Snapshot = KnativeSnapshot;

    async fn fetch(&self, key: &PassKey) -> Result<Option<KnativeSnapshot>, ReconcileErr> {
        let ns = key.namespace.as_str();
        let confs: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), ns, &configuration_resource());
        let Some(conf) = confs.get_opt(&key.name).await? else {
            debug!("configuration not found");
            return Ok(None);
        };

        let routes: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), ns, &route_resource());
        let Some(route) = routes.get_opt(&key.name).await? else {
            debug!("route not found");
            return Ok(None);
        };

        let app = match markers::deployment_name(&conf.metadata) {
            "" => key.name.as_str(),
            app => app,
        };

        let mut revisions = Vec::new();
        for obj in snapshot::list_app_revisions(&self.client, ns, app).await? {
            let revision = revision_snapshot(&obj)?;
            let workload =
                snapshot::revision_workload(&self.client, ns, &revision.name).await?;
            revisions.push(RevisionObservation { revision, workload });
        }

        let view = configuration_view(&conf)?;
        let observation = KnativeObservation {
            name: key.name.clone(),
            revision_number: RevisionNumber::from_meta(&conf.metadata),
            latest_created_revision_name: view.latest_created_revision_name,
            latest_ready_revision_name: view.latest_ready_revision_name,
            revisions,
            traffic: route_traffic(&route)?,
        };
        let pods = snapshot::list_app_pods(&self.client, ns, app).await?;

        Ok(Some(KnativeSnapshot {
            observation,
            pods,
            observed_at: Utc::now(),
        }))
    }

    fn assemble(&self, snapshot: &KnativeSnapshot) -> Result<Assembled, ReconcileErr> {
        let problems = aggregate(&snapshot.pods, &default_probes(snapshot.observed_at));
        let status = assemble_knative(&snapshot.observation, problems)?;
        Ok(Assembled {
            name: snapshot.observation.name.clone(),
            status,
        })
    }
}

#[instrument(skip_all, fields(ns = %obj.namespace().unwrap_or_default(), name = %obj.name_any()))]
async fn reconcile(
    obj: Arc<DynamicObject>,
    ctx: Arc<ControllerContext>,
) -> Result<Action, ReconcileErr> {
    if !OwnershipMarker::from_meta(&obj.metadata).present {
        return Ok(Action::await_change());
    }
    let ns = obj
        .namespace()
        .ok_or_else(|| super::into_internal("configuration has no namespace"))?;
    let key = PassKey::new(ns, obj.name_any());
    let source = KnativeSource::new(ctx.client.clone());
    run_pass(&source, ctx.sink.as_ref(), &ctx.cfg.environment, &key).await?;
    Ok(Action::await_change())
}

/// Configuration that Knative stamped onto a revision-owned object.
fn owning_configuration<K: ResourceExt>(
    obj: &K,
    conf_ar: &ApiResource,
) -> Option<ObjectRef<DynamicObject>> {
    let ns = obj.namespace()?;
    let conf = markers::configuration_name(obj.meta())?;
    Some(ObjectRef::new_with(conf, conf_ar.clone()).within(&ns))
}

/// Watch Configurations of managed apps. Route, backing Deployment and pod
/// changes requeue the Configuration of the same app. Pods are watched
/// because a container can start crash looping while every Knative object
/// and replica counter stays the same.
pub async fn run_controller(ctx: Arc<ControllerContext>) -> anyhow::Result<()> {
    let client = ctx.client.clone();
    let conf_ar = configuration_resource();
    let confs: Api<DynamicObject> = Api::all_with(client.clone(), &conf_ar);
    let routes: Api<DynamicObject> = Api::all_with(client.clone(), &route_resource());
    let deployments: Api<Deployment> = Api::all(client.clone());
    let pods: Api<Pod> = Api::all(client);
    let wc = watcher::Config::default().labels(APP_LABEL);

    let route_ar = conf_ar.clone();
    let deploy_ar = conf_ar.clone();
    let pod_ar = conf_ar.clone();

    info!("starting knative configuration controller");
    Controller::new_with(confs, wc.clone(), conf_ar)
        .watches_with(routes, route_resource(), wc.clone(), move |route| {
            let ns = route.namespace()?;
            Some(ObjectRef::new_with(&route.name_any(), route_ar.clone()).within(&ns))
        })
        .watches(deployments, wc.clone(), move |d: Deployment| {
            owning_configuration(&d, &deploy_ar)
        })
        .watches(pods, wc, move |p: Pod| owning_configuration(&p, &pod_ar))
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
