//! Built-in client defaults (layer 1)

use adl_protocol::{DEFAULT_API_VERSION, DEFAULT_ENDPOINT_SUFFIX};

use super::{ClientConfig, EndpointConfig};

/// Request timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 100;

/// URL scheme for the job endpoint
pub const DEFAULT_SCHEME: &str = "https";

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            suffix: DEFAULT_ENDPOINT_SUFFIX.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            access_token: None,
        }
    }
}
