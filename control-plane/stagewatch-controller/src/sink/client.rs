use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use reqwest::Url;
use serde::Serialize;
use stagewatch_models::{CompositeStatus, EnvironmentConfig};
use tracing::debug;

use super::{SinkError, StatusSink};
use crate::config::ControllerConfig;

/// Status server client speaking the `/api/v1` JSON API.
#[derive(Clone, Debug)]
pub struct HttpSink {
    client: reqwest::Client,
    base: Url,
    apikey: String,
}

/// Parse the status server base URL. Only absolute http(s) URLs are accepted.
pub fn parse_base_url(raw: &str) -> Result<Url, SinkError> {
    let url = Url::parse(raw.trim()).map_err(|e| SinkError::Url(format!("{raw:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(SinkError::Url(format!("{raw:?}: expected an http or https url")));
    }
    Ok(url)
}

impl HttpSink {
    pub fn new(
        base: impl Into<String>,
        apikey: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SinkError> {
        let base = parse_base_url(&base.into())?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            apikey: apikey.into(),
        })
    }

    pub fn from_config(cfg: &ControllerConfig) -> Result<Self, SinkError> {
        Self::new(
            cfg.server_url.clone(),
            cfg.server_apikey.clone(),
            Duration::from_secs(cfg.server_timeout_secs),
        )
    }

    /// `base` + `/api/v1/` + segments, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SinkError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| SinkError::Url(self.base.to_string()))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    async fn put<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<(), SinkError> {
        let url = self.endpoint(segments)?;
        let mut req = self
            .client
            .put(url.clone())
            .header(http::header::AUTHORIZATION, format!("Apikey {}", self.apikey));
        if let Some(body) = body {
            req = req.json(body);
        }
        let res = req.send().await?;
        let status = res.status();
        debug!(%url, status = status.as_u16(), "status server response");
        if status.is_success() {
            return Ok(());
        }
        let body = res.text().await.unwrap_or_default();
        if status == StatusCode::CONFLICT {
            return Err(SinkError::Conflict(body));
        }
        Err(SinkError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl StatusSink for HttpSink {
    async fn push_status(
        &self,
        name: &str,
        environment: &str,
        status: &CompositeStatus,
    ) -> Result<(), SinkError> {
        self.put(&["deployments", name, "status", environment], Some(status))
            .await
    }

    async fn ping(&self, environment: &str) -> Result<(), SinkError> {
        self.put::<()>(&["environments", environment, "ping"], None)
            .await
    }

    async fn set_environment_config(
        &self,
        environment: &str,
        config: &EnvironmentConfig,
    ) -> Result<(), SinkError> {
        self.put(&["environments", environment, "config"], Some(config))
            .await
    }
}
