//! Job property construction
//!
//! Turns the raw submission options into the typed properties variant for
//! the job type.

use std::collections::BTreeMap;

use adl_protocol::{CompileMode, HiveJobProperties, JobProperties, JobType, USqlJobProperties};

/// Warning emitted when configurations are supplied for a U-SQL job
pub const USQL_CONFIGURATIONS_WARNING: &str =
    "Custom configurations are only supported for Hive jobs; the supplied configurations will be ignored";

/// Raw options that shape the properties
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyOptions<'a> {
    pub runtime: Option<&'a str>,
    pub compile_mode: Option<&'a str>,
    pub configurations: Option<&'a BTreeMap<String, String>>,
}

/// Properties plus any non-fatal warnings raised while building them
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltProperties {
    pub properties: JobProperties,
    pub warnings: Vec<String>,
}

/// Build the properties variant for `job_type`.
///
/// Never fails: a compile mode that does not parse is dropped, and
/// configurations on a U-SQL job are dropped with a warning.
pub fn build_properties(job_type: JobType, script: String, options: PropertyOptions<'_>) -> BuiltProperties {
    let runtime = options.runtime.filter(|r| !r.is_empty()).map(str::to_string);
    let mut warnings = Vec::new();

    let properties = match job_type {
        JobType::USql => {
            if options.configurations.is_some_and(|c| !c.is_empty()) {
                tracing::warn!("{}", USQL_CONFIGURATIONS_WARNING);
                warnings.push(USQL_CONFIGURATIONS_WARNING.to_string());
            }

            let mut props = USqlJobProperties::new(script);
            props.compile_mode = options
                .compile_mode
                .filter(|m| !m.is_empty())
                .and_then(|m| match m.parse::<CompileMode>() {
                    Ok(mode) => Some(mode),
                    Err(e) => {
                        tracing::debug!("ignoring compile mode: {}", e);
                        None
                    }
                });
            props.runtime_version = runtime;
            JobProperties::USql(props)
        }
        JobType::Hive => {
            let configurations = options.configurations.cloned().unwrap_or_default();
            let mut props = HiveJobProperties::new(script, configurations);
            props.runtime_version = runtime;
            JobProperties::Hive(props)
        }
    };

    BuiltProperties { properties, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn usql(built: &BuiltProperties) -> &USqlJobProperties {
        match built.properties {
            JobProperties::USql(ref p) => p,
            _ => panic!("expected U-SQL properties"),
        }
    }

    fn hive(built: &BuiltProperties) -> &HiveJobProperties {
        match built.properties {
            JobProperties::Hive(ref p) => p,
            _ => panic!("expected Hive properties"),
        }
    }

    #[test]
    fn test_usql_compile_mode_full() {
        let built = build_properties(
            JobType::USql,
            "SELECT 1;".to_string(),
            PropertyOptions {
                compile_mode: Some("Full"),
                ..PropertyOptions::default()
            },
        );

        assert_eq!(usql(&built).compile_mode, Some(CompileMode::Full));
        assert!(built.warnings.is_empty());
    }

    #[test]
    fn test_usql_garbage_compile_mode_is_dropped() {
        let built = build_properties(
            JobType::USql,
            "SELECT 1;".to_string(),
            PropertyOptions {
                compile_mode: Some("garbage"),
                ..PropertyOptions::default()
            },
        );

        assert_eq!(usql(&built).compile_mode, None);
        assert!(built.warnings.is_empty());
    }

    #[test]
    fn test_usql_configurations_warn_and_are_dropped() {
        let supplied = configs(&[("hive.exec.parallel", "true")]);
        let built = build_properties(
            JobType::USql,
            "SELECT 1;".to_string(),
            PropertyOptions {
                configurations: Some(&supplied),
                ..PropertyOptions::default()
            },
        );

        assert_eq!(built.warnings, vec![USQL_CONFIGURATIONS_WARNING.to_string()]);
        let value = serde_json::to_value(&built.properties).unwrap();
        assert!(value.get("configurations").is_none());
    }

    #[test]
    fn test_usql_empty_configurations_do_not_warn() {
        let supplied = BTreeMap::new();
        let built = build_properties(
            JobType::USql,
            "SELECT 1;".to_string(),
            PropertyOptions {
                configurations: Some(&supplied),
                ..PropertyOptions::default()
            },
        );

        assert!(built.warnings.is_empty());
    }

    #[test]
    fn test_runtime_applies_to_both_types() {
        let options = PropertyOptions {
            runtime: Some("release_20261001"),
            ..PropertyOptions::default()
        };

        let built = build_properties(JobType::USql, "a".to_string(), options);
        assert_eq!(built.properties.runtime_version(), Some("release_20261001"));

        let built = build_properties(JobType::Hive, "a".to_string(), options);
        assert_eq!(built.properties.runtime_version(), Some("release_20261001"));

        let built = build_properties(
            JobType::USql,
            "a".to_string(),
            PropertyOptions {
                runtime: Some(""),
                ..PropertyOptions::default()
            },
        );
        assert_eq!(built.properties.runtime_version(), None);
    }

    #[test]
    fn test_hive_configurations_copied() {
        let supplied = configs(&[("a", "1")]);
        let built = build_properties(
            JobType::Hive,
            "SHOW TABLES;".to_string(),
            PropertyOptions {
                configurations: Some(&supplied),
                ..PropertyOptions::default()
            },
        );

        assert_eq!(hive(&built).configurations, configs(&[("a", "1")]));
        assert_eq!(hive(&built).script, "SHOW TABLES;");
        assert!(built.warnings.is_empty());
    }

    #[test]
    fn test_hive_without_configurations_is_empty_map() {
        let built = build_properties(JobType::Hive, "SHOW TABLES;".to_string(), PropertyOptions::default());

        assert!(hive(&built).configurations.is_empty());
        let value = serde_json::to_value(&built.properties).unwrap();
        assert_eq!(value["configurations"], serde_json::json!({}));
    }

    #[test]
    fn test_hive_ignores_compile_mode() {
        let built = build_properties(
            JobType::Hive,
            "SHOW TABLES;".to_string(),
            PropertyOptions {
                compile_mode: Some("Full"),
                ..PropertyOptions::default()
            },
        );

        let value = serde_json::to_value(&built.properties).unwrap();
        assert!(value.get("compileMode").is_none());
    }
}
