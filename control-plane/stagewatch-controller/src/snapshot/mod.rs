//! Read-only snapshots taken from cluster objects once per pass.

pub mod knative;
pub mod lister;
pub mod workload;

pub use knative::{
    ConfigurationView, configuration_resource, configuration_view, revision_snapshot,
    route_resource, route_traffic,
};
pub use lister::{list_app_pods, list_app_revisions, revision_workload};
pub use workload::{pod_snapshot, workload_snapshot};
