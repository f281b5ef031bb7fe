//! Effective configuration with provenance
//!
//! Records which layers contributed to the merged configuration so that
//! `adl-job config` can show where a value came from.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::merge::merge_layers;
use super::{ClientConfig, ConfigError, ConfigOverrides};

const REDACTED: &str = "[REDACTED]";

/// Origin of a configuration layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Env,
    Cli,
}

/// A contributing layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (file layer only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ConfigSource {
    fn new(origin: ConfigOrigin) -> Self {
        Self { origin, path: None }
    }
}

/// The merged client configuration plus the layers it came from
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub config: ClientConfig,
    pub sources: Vec<ConfigSource>,
}

/// Which config file to read
#[derive(Debug, Clone)]
pub enum ConfigFile {
    /// Given explicitly; must exist
    Explicit(PathBuf),
    /// The default location; skipped when absent
    Default(PathBuf),
    /// No file layer
    None,
}

impl ConfigFile {
    /// `~/.config/adl/config.toml`, or no file when HOME is unset
    pub fn default_location() -> Self {
        match std::env::var("HOME") {
            Ok(home) => ConfigFile::Default(PathBuf::from(home).join(".config/adl/config.toml")),
            Err(_) => ConfigFile::None,
        }
    }
}

impl EffectiveConfig {
    /// Merge defaults, the config file, environment and CLI layers.
    pub fn build(
        file: &ConfigFile,
        env: &ConfigOverrides,
        cli: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        layers.push(serde_json::to_value(ClientConfig::default()).map_err(|e| {
            ConfigError::Invalid {
                field: "defaults".to_string(),
                reason: e.to_string(),
            }
        })?);
        sources.push(ConfigSource::new(ConfigOrigin::Builtin));

        let file_path = match file {
            ConfigFile::Explicit(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.clone()));
            }
            ConfigFile::Explicit(path) => Some(path.as_path()),
            ConfigFile::Default(path) if path.exists() => Some(path.as_path()),
            ConfigFile::Default(_) | ConfigFile::None => None,
        };
        if let Some(path) = file_path {
            layers.push(load_toml_file(path)?);
            sources.push(ConfigSource {
                origin: ConfigOrigin::File,
                path: Some(path.display().to_string()),
            });
        }

        for (origin, overrides) in [(ConfigOrigin::Env, env), (ConfigOrigin::Cli, cli)] {
            if !overrides.is_empty() {
                layers.push(overrides.to_value());
                sources.push(ConfigSource::new(origin));
            }
        }

        let merged = merge_layers(layers);
        let config: ClientConfig =
            serde_json::from_value(merged).map_err(|e| ConfigError::Invalid {
                field: "config".to_string(),
                reason: e.to_string(),
            })?;
        config.validate()?;

        tracing::debug!(
            layers = sources.len(),
            suffix = %config.endpoint.suffix,
            "resolved client configuration"
        );

        Ok(Self { config, sources })
    }

    /// JSON view with the access token redacted
    pub fn to_redacted_value(&self) -> Value {
        let mut config = self.config.clone();
        if config.access_token.is_some() {
            config.access_token = Some(REDACTED.to_string());
        }
        json!({
            "config": config,
            "sources": self.sources,
        })
    }

    /// Human-readable view with the access token redacted
    pub fn to_human(&self) -> String {
        let config = &self.config;
        let mut lines = vec![
            format!("Endpoint: {}://<account>.{}", config.endpoint.scheme, config.endpoint.suffix),
            format!("API version: {}", config.endpoint.api_version),
            format!("Timeout: {}s", config.timeout_seconds),
            format!(
                "Access token: {}",
                if config.access_token.is_some() { REDACTED } else { "(not set)" }
            ),
            "Sources:".to_string(),
        ];
        for source in &self.sources {
            match source.path {
                Some(ref path) => lines.push(format!("  {:?}: {}", source.origin, path)),
                None => lines.push(format!("  {:?}", source.origin)),
            }
        }
        lines.join("\n")
    }
}

/// Parse a TOML config file into a JSON layer
fn load_toml_file(path: &Path) -> Result<Value, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let table: toml::Table = toml::from_str(&contents)?;
    serde_json::to_value(table).map_err(|e| ConfigError::Invalid {
        field: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_only() {
        let effective =
            EffectiveConfig::build(&ConfigFile::None, &ConfigOverrides::default(), &ConfigOverrides::default())
                .unwrap();

        assert_eq!(effective.config, ClientConfig::default());
        assert_eq!(effective.sources, vec![ConfigSource::new(ConfigOrigin::Builtin)]);
    }

    #[test]
    fn test_missing_default_file_is_skipped() {
        let file = ConfigFile::Default(PathBuf::from("/nonexistent/adl/config.toml"));
        let effective =
            EffectiveConfig::build(&file, &ConfigOverrides::default(), &ConfigOverrides::default())
                .unwrap();

        assert_eq!(effective.sources.len(), 1);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let file = ConfigFile::Explicit(PathBuf::from("/nonexistent/adl/config.toml"));
        let result =
            EffectiveConfig::build(&file, &ConfigOverrides::default(), &ConfigOverrides::default());

        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_layer_precedence() {
        let toml = write_config(
            r#"
            timeout_seconds = 60
            access_token = "from-file"

            [endpoint]
            suffix = "file.example.net"
            api_version = "2015-10-01-preview"
            "#,
        );
        let env = ConfigOverrides {
            endpoint_suffix: Some("env.example.net".to_string()),
            timeout_seconds: Some(30),
            ..ConfigOverrides::default()
        };
        let cli = ConfigOverrides {
            timeout_seconds: Some(5),
            ..ConfigOverrides::default()
        };

        let effective =
            EffectiveConfig::build(&ConfigFile::Explicit(toml.path().to_path_buf()), &env, &cli)
                .unwrap();

        assert_eq!(effective.config.timeout_seconds, 5);
        assert_eq!(effective.config.endpoint.suffix, "env.example.net");
        assert_eq!(effective.config.endpoint.api_version, "2015-10-01-preview");
        assert_eq!(effective.config.endpoint.scheme, "https");
        assert_eq!(effective.config.access_token.as_deref(), Some("from-file"));

        let origins: Vec<_> = effective.sources.iter().map(|s| s.origin).collect();
        assert_eq!(
            origins,
            vec![ConfigOrigin::Builtin, ConfigOrigin::File, ConfigOrigin::Env, ConfigOrigin::Cli]
        );
    }

    #[test]
    fn test_malformed_file() {
        let toml = write_config("timeout_seconds = = 3");
        let result = EffectiveConfig::build(
            &ConfigFile::Explicit(toml.path().to_path_buf()),
            &ConfigOverrides::default(),
            &ConfigOverrides::default(),
        );

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_wrong_type_in_file() {
        let toml = write_config("timeout_seconds = \"fast\"");
        let result = EffectiveConfig::build(
            &ConfigFile::Explicit(toml.path().to_path_buf()),
            &ConfigOverrides::default(),
            &ConfigOverrides::default(),
        );

        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_token_is_redacted() {
        let cli = ConfigOverrides {
            access_token: Some("super-secret".to_string()),
            ..ConfigOverrides::default()
        };
        let effective =
            EffectiveConfig::build(&ConfigFile::None, &ConfigOverrides::default(), &cli).unwrap();

        assert_eq!(effective.config.access_token.as_deref(), Some("super-secret"));

        let value = effective.to_redacted_value();
        assert_eq!(value["config"]["access_token"], "[REDACTED]");
        assert_eq!(value["sources"][1]["origin"], "cli");
        assert!(!effective.to_human().contains("super-secret"));
    }
}
