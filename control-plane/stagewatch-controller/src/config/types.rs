use std::time::Duration;

use envconfig::Envconfig;

#[derive(Envconfig, Clone, Debug)]
pub struct ControllerConfig {
    /// Base URL of the status server, e.g. https://status.example.com
    #[envconfig(from = "STAGEWATCH_SERVER_URL")]
    pub server_url: String,

    #[envconfig(from = "STAGEWATCH_SERVER_APIKEY")]
    pub server_apikey: String,

    /// Environment (stage) this controller reports for
    #[envconfig(from = "STAGEWATCH_ENVIRONMENT")]
    pub environment: String,

    #[envconfig(from = "STAGEWATCH_SERVER_PING_SECONDS", default = "10")]
    pub server_ping_seconds: u64,

    #[envconfig(from = "STAGEWATCH_SERVER_TIMEOUT_SECS", default = "10")]
    pub server_timeout_secs: u64,

    /// Delay before a failed reconcile pass is retried by the controller runtime.
    #[envconfig(from = "STAGEWATCH_REQUEUE_SECS", default = "30")]
    pub requeue_secs: u64,

    #[envconfig(from = "HTTP_PORT", default = "8080")]
    pub http_port: u16,

    #[envconfig(nested)]
    pub features: FeaturesConfig,

    #[envconfig(nested)]
    pub sealed_secret: SealedSecretConfig,
}

#[derive(Envconfig, Clone, Debug)]
pub struct FeaturesConfig {
    /// Knative Configuration/Route status reporting
    #[envconfig(from = "STAGEWATCH_FEATURES_KNATIVE", default = "true")]
    pub knative: bool,
    /// Plain apps/v1 Deployment status reporting
    #[envconfig(from = "STAGEWATCH_FEATURES_DEPLOYMENTS", default = "false")]
    pub deployments: bool,
    /// Publish the Knative custom domain as the environment gateway host
    #[envconfig(from = "STAGEWATCH_FEATURES_DOMAIN", default = "true")]
    pub domain: bool,
}

#[derive(Envconfig, Clone, Debug)]
pub struct SealedSecretConfig {
    #[envconfig(from = "STAGEWATCH_SEALEDSECRET_ENABLED", default = "true")]
    pub enabled: bool,
    #[envconfig(
        from = "STAGEWATCH_SEALEDSECRET_CONTROLLER_NAME",
        default = "sealed-secrets-controller"
    )]
    pub controller_name: String,
    #[envconfig(
        from = "STAGEWATCH_SEALEDSECRET_NAMESPACE",
        default = "kube-system"
    )]
    pub namespace: String,
    /// Env: STAGEWATCH_SEALEDSECRET_CERT_REFRESH_DURATION (e.g. "24h", "30m")
    #[envconfig(
        from = "STAGEWATCH_SEALEDSECRET_CERT_REFRESH_DURATION",
        default = "24h"
    )]
    pub cert_refresh_duration: String,
    #[envconfig(
        from = "STAGEWATCH_SEALEDSECRET_RETRY_ATTEMPTS",
        default = "3"
    )]
    pub retry_attempts: u32,
}

impl ControllerConfig {
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.server_ping_seconds.max(1))
    }

    pub fn requeue_delay(&self) -> Duration {
        Duration::from_secs(self.requeue_secs)
    }

    /// Reject settings that would only fail later at runtime.
    pub fn validate(&self) -> anyhow::Result<()> {
        crate::sink::parse_base_url(&self.server_url)
            .map_err(|e| anyhow::anyhow!("STAGEWATCH_SERVER_URL: {}", e))?;
        if self.environment.trim().is_empty() {
            anyhow::bail!("STAGEWATCH_ENVIRONMENT must not be empty");
        }
        if self.sealed_secret.enabled {
            self.sealed_secret.refresh_interval()?;
        }
        Ok(())
    }
}

impl SealedSecretConfig {
    /// Accepts Go-style durations such as "24h", "90s" or "1h30m".
    pub fn refresh_interval(&self) -> anyhow::Result<Duration> {
        let raw = self.cert_refresh_duration.trim();
        match humantime::parse_duration(raw) {
            Ok(d) if !d.is_zero() => Ok(d),
            Ok(_) => anyhow::bail!(
                "invalid sealed secret cert refresh duration: {:?}: must be positive",
                self.cert_refresh_duration
            ),
            Err(e) => anyhow::bail!(
                "invalid sealed secret cert refresh duration: {:?}: {}",
                self.cert_refresh_duration,
                e
            ),
        }
    }
}
