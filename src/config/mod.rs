//! Client configuration
//!
//! The effective client configuration is merged from four layers, lowest
//! precedence first:
//! 1. Built-in defaults
//! 2. User config file (~/.config/adl/config.toml)
//! 3. Environment (ADL_*)
//! 4. CLI flags

mod defaults;
mod effective;
mod merge;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub use defaults::{DEFAULT_SCHEME, DEFAULT_TIMEOUT_SECONDS};
pub use effective::{ConfigFile, ConfigOrigin, ConfigSource, EffectiveConfig};
pub use merge::{merge_layers, overlay};

/// Longest request timeout accepted, in seconds
pub const MAX_TIMEOUT_SECONDS: u64 = 3600;

/// Settings for talking to the job endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub endpoint: EndpointConfig,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Pre-acquired bearer token, forwarded verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Where the job endpoint lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// `https` or `http`
    pub scheme: String,

    /// DNS suffix appended to the account name
    pub suffix: String,

    /// REST api-version query value
    pub api_version: String,
}

impl ClientConfig {
    /// Check value ranges after merging
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.scheme != "https" && self.endpoint.scheme != "http" {
            return Err(ConfigError::invalid(
                "endpoint.scheme",
                format!("expected https or http, got '{}'", self.endpoint.scheme),
            ));
        }
        if self.endpoint.suffix.trim().is_empty() {
            return Err(ConfigError::invalid("endpoint.suffix", "must not be empty"));
        }
        if self.endpoint.api_version.trim().is_empty() {
            return Err(ConfigError::invalid("endpoint.api_version", "must not be empty"));
        }
        if self.timeout_seconds == 0 || self.timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(ConfigError::invalid(
                "timeout_seconds",
                format!("must be in (0, {}]", MAX_TIMEOUT_SECONDS),
            ));
        }
        Ok(())
    }
}

/// Values supplied by the environment or the command line.
///
/// Only the fields that are set end up in the layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub scheme: Option<String>,
    pub endpoint_suffix: Option<String>,
    pub api_version: Option<String>,
    pub access_token: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Environment variable names read by [`ConfigOverrides::from_env`]
pub const ENV_SCHEME: &str = "ADL_ENDPOINT_SCHEME";
pub const ENV_ENDPOINT_SUFFIX: &str = "ADL_ENDPOINT_SUFFIX";
pub const ENV_API_VERSION: &str = "ADL_API_VERSION";
pub const ENV_ACCESS_TOKEN: &str = "ADL_ACCESS_TOKEN";
pub const ENV_TIMEOUT_SECONDS: &str = "ADL_TIMEOUT_SECONDS";

impl ConfigOverrides {
    /// Read overrides through `lookup` (normally `std::env::var`).
    ///
    /// Empty variables are treated as unset.
    pub fn from_env<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let timeout_seconds = match get(ENV_TIMEOUT_SECONDS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::invalid(ENV_TIMEOUT_SECONDS, format!("'{}': {}", raw, e))
            })?),
            None => None,
        };

        Ok(Self {
            scheme: get(ENV_SCHEME),
            endpoint_suffix: get(ENV_ENDPOINT_SUFFIX),
            api_version: get(ENV_API_VERSION),
            access_token: get(ENV_ACCESS_TOKEN),
            timeout_seconds,
        })
    }

    /// Read overrides from the process environment
    pub fn from_process_env() -> Result<Self, ConfigError> {
        Self::from_env(|name| std::env::var(name).ok())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Convert to a config layer
    pub fn to_value(&self) -> Value {
        let mut endpoint = Map::new();
        if let Some(ref scheme) = self.scheme {
            endpoint.insert("scheme".to_string(), json!(scheme));
        }
        if let Some(ref suffix) = self.endpoint_suffix {
            endpoint.insert("suffix".to_string(), json!(suffix));
        }
        if let Some(ref version) = self.api_version {
            endpoint.insert("api_version".to_string(), json!(version));
        }

        let mut layer = Map::new();
        if !endpoint.is_empty() {
            layer.insert("endpoint".to_string(), Value::Object(endpoint));
        }
        if let Some(ref token) = self.access_token {
            layer.insert("access_token".to_string(), json!(token));
        }
        if let Some(timeout) = self.timeout_seconds {
            layer.insert("timeout_seconds".to_string(), json!(timeout));
        }
        Value::Object(layer)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
