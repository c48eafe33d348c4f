use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kube::Client;
use stagewatch_models::EnvironmentConfig;
use tokio::time::MissedTickBehavior;
use tracing::{info, instrument, warn};

use crate::config::SealedSecretConfig;
use crate::sink::StatusSink;

/// Delay between attempts of one refresh.
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Where the sealed-secrets public certificate comes from.
#[async_trait]
pub trait CertSource: Send + Sync {
    async fn fetch_cert(&self) -> anyhow::Result<String>;
}

/// Reads `/v1/cert.pem` from the sealed-secrets controller through the
/// API server service proxy. Only the public certificate is reachable this
/// way; the controller's private key never leaves its secret.
pub struct ServiceProxyCertSource {
    client: Client,
    namespace: String,
    service: String,
}

impl ServiceProxyCertSource {
    pub fn new(client: Client, cfg: &SealedSecretConfig) -> Self {
        Self {
            client,
            namespace: cfg.namespace.clone(),
            service: cfg.controller_name.clone(),
        }
    }
}

/// API server proxy path of the sealed-secrets certificate endpoint.
pub fn cert_proxy_path(namespace: &str, service: &str) -> String {
    format!(
        "/api/v1/namespaces/{}/services/http:{}:/proxy/v1/cert.pem",
        namespace, service
    )
}

#[async_trait]
impl CertSource for ServiceProxyCertSource {
    async fn fetch_cert(&self) -> anyhow::Result<String> {
        let path = cert_proxy_path(&self.namespace, &self.service);
        let req = http::Request::get(path).body(Vec::new())?;
        Ok(self.client.request_text(req).await?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }
}

/// Keeps the environment's sealed-secret certificate current on the status
/// server. Rotation inside the sealed-secrets controller keeps old keys, so
/// publishing within one refresh interval is enough.
pub struct CertRefresher {
    source: Arc<dyn CertSource>,
    sink: Arc<dyn StatusSink>,
    environment: String,
    retry: RetryPolicy,
}

impl CertRefresher {
    pub fn new(
        source: Arc<dyn CertSource>,
        sink: Arc<dyn StatusSink>,
        environment: String,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            source,
            sink,
            environment,
            retry,
        }
    }

    async fn try_refresh(&self) -> anyhow::Result<()> {
        let cert = self.source.fetch_cert().await?;
        self.sink
            .set_environment_config(
                &self.environment,
                &EnvironmentConfig::with_sealed_secret_cert(cert),
            )
            .await?;
        Ok(())
    }

    /// One refresh with at most `retry.attempts` tries.
    #[instrument(skip_all, fields(environment = %self.environment))]
    pub async fn refresh(&self) -> anyhow::Result<()> {
        let mut attempt = 1;
        loop {
            match self.try_refresh().await {
                Ok(()) => {
                    info!("updated sealed secret cert");
                    return Ok(());
                }
                Err(e) if attempt < self.retry.attempts => {
                    warn!(attempt, error = %e, "error refreshing sealed secret cert; retrying");
                    tokio::time::sleep(self.retry.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(e.context(format!(
                        "sealed secret cert refresh failed after {} attempts",
                        attempt
                    )));
                }
            }
        }
    }

    /// Refresh now and then every `interval`. Failures wait for the next tick.
    pub async fn run(self, interval: Duration) -> anyhow::Result<()> {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = self.refresh().await {
                warn!(error = ?e, "sealed secret cert not updated");
            }
        }
    }
}
