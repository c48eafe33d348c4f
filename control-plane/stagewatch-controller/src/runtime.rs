use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::future::select_all;
use kube::Client;
use tokio::task::JoinHandle;
use tracing::info;

use crate::background::{
    CertRefresher, RETRY_DELAY, RetryPolicy, ServiceProxyCertSource, start_pinger,
};
use crate::config::ControllerConfig;
use crate::controller::{ControllerContext, deployment, domain, knative};
use crate::sink::{HttpSink, StatusSink};
use crate::web::run_http_server;

type Task = JoinHandle<anyhow::Result<()>>;

/// Compute the HTTP bind address based on config.
pub fn compute_http_addr(cfg: &ControllerConfig) -> SocketAddr {
    ([0, 0, 0, 0], cfg.http_port).into()
}

fn spawn_cert_refresher(
    client: Client,
    cfg: &ControllerConfig,
    sink: Arc<dyn StatusSink>,
) -> anyhow::Result<Task> {
    let interval = cfg.sealed_secret.refresh_interval()?;
    let source = Arc::new(ServiceProxyCertSource::new(client, &cfg.sealed_secret));
    let refresher = CertRefresher::new(
        source,
        sink,
        cfg.environment.clone(),
        RetryPolicy::new(cfg.sealed_secret.retry_attempts, RETRY_DELAY),
    );
    Ok(tokio::spawn(refresher.run(interval)))
}

/// Start the enabled controllers, background loops and the health server,
/// and return when the first of them stops.
pub async fn run_all(client: Client, cfg: ControllerConfig) -> anyhow::Result<()> {
    let sink: Arc<dyn StatusSink> = Arc::new(HttpSink::from_config(&cfg)?);

    let mut tasks: Vec<Task> = Vec::new();
    tasks.push(start_pinger(sink.clone(), cfg.environment.clone(), cfg.ping_interval()).await?);

    let ctx = Arc::new(ControllerContext {
        client: client.clone(),
        cfg: cfg.clone(),
        sink: sink.clone(),
    });
    if cfg.features.knative {
        tasks.push(tokio::spawn(knative::run_controller(ctx.clone())));
    }
    if cfg.features.deployments {
        tasks.push(tokio::spawn(deployment::run_controller(ctx.clone())));
    }
    if cfg.features.domain {
        tasks.push(tokio::spawn(domain::run_controller(ctx.clone())));
    }
    if cfg.sealed_secret.enabled {
        tasks.push(spawn_cert_refresher(client, &cfg, sink)?);
    }
    tasks.push(tokio::spawn(run_http_server(compute_http_addr(&cfg))));

    info!(tasks = tasks.len(), environment = %cfg.environment, "stagewatch running");
    let (res, idx, rest) = select_all(tasks).await;
    for t in rest {
        t.abort();
    }
    info!(task = idx, "task stopped; shutting down");
    res?
}
