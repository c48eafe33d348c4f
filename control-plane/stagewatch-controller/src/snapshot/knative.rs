use kube::ResourceExt;
use kube::core::{DynamicObject, GroupVersionKind};
use kube::discovery::ApiResource;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use stagewatch_models::TrafficEntry;

use super::workload::condition;
use crate::markers::{self, RevisionNumber};
use crate::status::{Condition, ContainerImage, RevisionSnapshot};

pub const KNATIVE_GROUP: &str = "serving.knative.dev";
pub const KNATIVE_VERSION: &str = "v1";

pub fn api_resource(kind: &str) -> ApiResource {
    ApiResource::from_gvk(&GroupVersionKind::gvk(KNATIVE_GROUP, KNATIVE_VERSION, kind))
}

pub fn configuration_resource() -> ApiResource {
    api_resource("Configuration")
}

pub fn route_resource() -> ApiResource {
    api_resource("Route")
}

pub fn revision_resource() -> ApiResource {
    api_resource("Revision")
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct KnCondition {
    #[serde(rename = "type")]
    type_: String,
    #[serde(default)]
    status: String,
    reason: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct KnStatus {
    observed_generation: i64,
    conditions: Vec<KnCondition>,
    latest_created_revision_name: String,
    latest_ready_revision_name: String,
    traffic: Vec<KnTraffic>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct KnTraffic {
    revision_name: String,
    percent: Option<i64>,
    tag: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct KnRevisionSpec {
    containers: Vec<KnContainer>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct KnContainer {
    name: String,
    image: String,
}

/// Decode one top-level field of a dynamic object; absent or null is the default.
fn field<T: DeserializeOwned + Default>(
    obj: &DynamicObject,
    key: &str,
) -> Result<T, serde_json::Error> {
    match obj.data.get(key) {
        None | Some(serde_json::Value::Null) => Ok(T::default()),
        Some(v) => T::deserialize(v),
    }
}

fn conditions(status: &KnStatus) -> Vec<Condition> {
    status
        .conditions
        .iter()
        .map(|c| condition(&c.type_, &c.status, c.reason.as_ref(), c.message.as_ref()))
        .collect()
}

pub fn revision_snapshot(obj: &DynamicObject) -> Result<RevisionSnapshot, serde_json::Error> {
    let spec: KnRevisionSpec = field(obj, "spec")?;
    let status: KnStatus = field(obj, "status")?;
    Ok(RevisionSnapshot {
        name: obj.name_any(),
        observed_generation: status.observed_generation,
        revision_number: RevisionNumber::from_meta(&obj.metadata),
        workload_name: markers::deployment_name(&obj.metadata).to_string(),
        conditions: conditions(&status),
        containers: spec
            .containers
            .into_iter()
            .map(|c| ContainerImage {
                name: c.name,
                image: c.image,
            })
            .collect(),
    })
}

/// Latest created and latest ready revision names of a Configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigurationView {
    pub latest_created_revision_name: String,
    pub latest_ready_revision_name: String,
}

pub fn configuration_view(obj: &DynamicObject) -> Result<ConfigurationView, serde_json::Error> {
    let status: KnStatus = field(obj, "status")?;
    Ok(ConfigurationView {
        latest_created_revision_name: status.latest_created_revision_name,
        latest_ready_revision_name: status.latest_ready_revision_name,
    })
}

/// Traffic targets of a Route, in reported order.
pub fn route_traffic(obj: &DynamicObject) -> Result<Vec<TrafficEntry>, serde_json::Error> {
    let status: KnStatus = field(obj, "status")?;
    Ok(status
        .traffic
        .into_iter()
        .map(|t| TrafficEntry {
            revision_name: t.revision_name,
            percent: t.percent,
            tag: t.tag,
        })
        .collect())
}
