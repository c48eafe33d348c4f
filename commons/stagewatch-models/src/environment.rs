use serde::{Deserialize, Serialize};

/// Per-environment settings published by the controller. Only the fields
/// that are set are sent; the server merges them into its stored config.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_gateway_host: Option<String>,
    /// PEM encoded public certificate of the sealed secrets controller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sealed_secret_cert: Option<String>,
}

impl EnvironmentConfig {
    pub fn with_public_gateway_host(host: impl Into<String>) -> Self {
        Self {
            public_gateway_host: Some(host.into()),
            ..Default::default()
        }
    }

    pub fn with_sealed_secret_cert(cert: impl Into<String>) -> Self {
        Self {
            sealed_secret_cert: Some(cert.into()),
            ..Default::default()
        }
    }
}
