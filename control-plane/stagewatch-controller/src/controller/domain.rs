use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::StreamExt;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::ResourceExt;
use kube::api::Api;
use kube::runtime::controller::Action;
use kube::runtime::{Controller, watcher};
use stagewatch_models::EnvironmentConfig;
use tracing::{debug, error, info, instrument};

use super::{ControllerContext, ReconcileErr, error_policy};

pub const DOMAIN_CONFIG_NAME: &str = "config-domain";
pub const KNATIVE_SERVING_NAMESPACE: &str = "knative-serving";

/// First configured domain. Keys starting with `_` (such as `_example`)
/// are documentation, not domains. Only one domain per environment is
/// supported.
pub fn custom_domain(data: Option<&BTreeMap<String, String>>) -> Option<&str> {
    data?
        .keys()
        .find(|k| !k.is_empty() && !k.starts_with('_'))
        .map(String::as_str)
}

#[instrument(skip_all, fields(name = %obj.name_any()))]
async fn reconcile(
    obj: Arc<ConfigMap>,
    ctx: Arc<ControllerContext>,
) -> Result<Action, ReconcileErr> {
    let Some(domain) = custom_domain(obj.data.as_ref()) else {
        debug!("no custom domain configured");
        return Ok(Action::await_change());
    };
    info!(%domain, "found custom domain; updating environment config");
    ctx.sink
        .set_environment_config(
            &ctx.cfg.environment,
            &EnvironmentConfig::with_public_gateway_host(domain),
        )
        .await?;
    Ok(Action::await_change())
}

/// Publish the Knative custom domain as the environment's gateway host.
pub async fn run_controller(ctx: Arc<ControllerContext>) -> anyhow::Result<()> {
    let api: Api<ConfigMap> =
        Api::namespaced(ctx.client.clone(), KNATIVE_SERVING_NAMESPACE);
    let wc = watcher::Config::default()
        .fields(&format!("metadata.name={}", DOMAIN_CONFIG_NAME));
    info!("starting knative domain controller");
    Controller::new(api, wc)
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
