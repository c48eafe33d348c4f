//! Loops that run beside the controllers: keep-alive pings and the
//! sealed-secret certificate refresh.

pub mod cert_refresher;
pub mod pinger;

pub use cert_refresher::{
    CertRefresher, CertSource, RETRY_DELAY, RetryPolicy, ServiceProxyCertSource,
};
pub use pinger::start_pinger;
