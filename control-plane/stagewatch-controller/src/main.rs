use envconfig::Envconfig;
use kube::Client;
use stagewatch_controller::{config::ControllerConfig, init_tracing, runtime};
use tracing::info;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    // kube and reqwest both use rustls; pin the aws-lc-rs provider.
    if let Err(e) = rustls::crypto::CryptoProvider::install_default(
        rustls::crypto::aws_lc_rs::default_provider(),
    ) {
        tracing::debug!(?e, "CryptoProvider already installed; proceeding");
    }

    let cfg = ControllerConfig::init_from_env()?;
    cfg.validate()?;
    info!(
        server = %cfg.server_url,
        environment = %cfg.environment,
        features = ?cfg.features,
        "starting stagewatch controller"
    );

    let client = Client::try_default().await?;
    runtime::run_all(client, cfg).await
}
