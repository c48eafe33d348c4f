use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams};
use kube::core::DynamicObject;
use kube::Client;

use super::knative::revision_resource;
use super::workload::{pod_snapshot, workload_snapshot};
use crate::markers::{deployment_selector, revision_selector};
use crate::status::{PodSnapshot, WorkloadSnapshot};

/// Pods of one app, selected by the deployment label.
#[tracing::instrument(level = "debug", skip(client), fields(ns = %ns, app = %app))]
pub async fn list_app_pods(
    client: &Client,
    ns: &str,
    app: &str,
) -> Result<Vec<PodSnapshot>, kube::Error> {
    let api: Api<Pod> = Api::namespaced(client.clone(), ns);
    let lp = ListParams::default().labels(&deployment_selector(app));
    let list = api.list(&lp).await?;
    Ok(list.items.iter().map(pod_snapshot).collect())
}

/// Knative revisions of one app, in list order.
#[tracing::instrument(level = "debug", skip(client), fields(ns = %ns, app = %app))]
pub async fn list_app_revisions(
    client: &Client,
    ns: &str,
    app: &str,
) -> Result<Vec<DynamicObject>, kube::Error> {
    let api: Api<DynamicObject> =
        Api::namespaced_with(client.clone(), ns, &revision_resource());
    let lp = ListParams::default().labels(&deployment_selector(app));
    Ok(api.list(&lp).await?.items)
}

/// The Deployment Knative created for a revision, if it exists yet.
pub async fn revision_workload(
    client: &Client,
    ns: &str,
    revision: &str,
) -> Result<Option<WorkloadSnapshot>, kube::Error> {
    let api: Api<Deployment> = Api::namespaced(client.clone(), ns);
    let lp = ListParams::default().labels(&revision_selector(revision));
    let list = api.list(&lp).await?;
    Ok(list.items.first().map(workload_snapshot))
}
