//! Client side of the status server.

mod client;

use async_trait::async_trait;
use stagewatch_models::{CompositeStatus, EnvironmentConfig};
use thiserror::Error;

pub use client::{HttpSink, parse_base_url};

#[derive(Error, Debug)]
pub enum SinkError {
    /// The server already holds a newer observation for this key.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("status server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(String),
}

impl SinkError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, SinkError::Conflict(_))
    }
}

#[async_trait]
pub trait StatusSink: Send + Sync {
    /// Record the status of deployment `name` in `environment`.
    async fn push_status(
        &self,
        name: &str,
        environment: &str,
        status: &CompositeStatus,
    ) -> Result<(), SinkError>;

    async fn ping(&self, environment: &str) -> Result<(), SinkError>;

    async fn set_environment_config(
        &self,
        environment: &str,
        config: &EnvironmentConfig,
    ) -> Result<(), SinkError>;
}
