use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error};

use crate::sink::StatusSink;

/// Ping the status server once, then keep pinging on `interval` in the
/// background. The server tracks the last contact per environment, and
/// quiet environments would otherwise look disconnected.
///
/// The first ping is awaited because it registers a new environment; its
/// failure is a startup error. Later failures are only logged.
pub async fn start_pinger(
    sink: Arc<dyn StatusSink>,
    environment: String,
    interval: Duration,
) -> anyhow::Result<JoinHandle<anyhow::Result<()>>> {
    sink.ping(&environment)
        .await
        .with_context(|| format!("initial ping for environment {:?} failed", environment))?;
    debug!(%environment, "initial ping ok");
    Ok(tokio::spawn(ping_loop(sink, environment, interval)))
}

async fn ping_loop(
    sink: Arc<dyn StatusSink>,
    environment: String,
    interval: Duration,
) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // interval fires immediately; the initial ping already happened
    ticker.tick().await;
    loop {
        ticker.tick().await;
        if let Err(e) = sink.ping(&environment).await {
            error!(%environment, error = %e, "error pinging environment");
        }
    }
}
