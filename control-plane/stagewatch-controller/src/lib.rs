pub mod background;
pub mod config;
pub mod controller;
pub mod markers;
pub mod runtime;
pub mod sink;
pub mod snapshot;
pub mod status;
pub mod web;

use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Install the global subscriber. `RUST_LOG` wins; `default_env` is added
/// as an extra directive.
pub fn init_tracing(default_env: &str) {
    let directive = default_env
        .parse()
        .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into());
    let filter = EnvFilter::builder()
        .with_env_var("RUST_LOG")
        .from_env_lossy()
        .add_directive(directive);

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init();
}
