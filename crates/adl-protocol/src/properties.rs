//! Job-type-specific properties.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::job::{CompileMode, JobType};

/// Properties of a job, tagged on `"type"` the way the service expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JobProperties {
    USql(USqlJobProperties),
    Hive(HiveJobProperties),
}

impl JobProperties {
    pub fn job_type(&self) -> JobType {
        match self {
            JobProperties::USql(_) => JobType::USql,
            JobProperties::Hive(_) => JobType::Hive,
        }
    }

    pub fn script(&self) -> &str {
        match self {
            JobProperties::USql(p) => &p.script,
            JobProperties::Hive(p) => &p.script,
        }
    }

    pub fn runtime_version(&self) -> Option<&str> {
        match self {
            JobProperties::USql(p) => p.runtime_version.as_deref(),
            JobProperties::Hive(p) => p.runtime_version.as_deref(),
        }
    }
}

/// U-SQL job properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct USqlJobProperties {
    /// Script text
    pub script: String,

    /// Runtime version; the service default is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile_mode: Option<CompileMode>,

    // Populated by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algebra_file_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_compilation_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_queued_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_running_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yarn_application_id: Option<i64>,
}

impl USqlJobProperties {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }
}

/// Hive job properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiveJobProperties {
    /// Script text
    pub script: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,

    /// Custom configurations; serialized as `{}` when empty, never null
    #[serde(default)]
    pub configurations: BTreeMap<String, String>,

    // Populated by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs_location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_count: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_statement_count: Option<i32>,
}

impl HiveJobProperties {
    pub fn new(script: impl Into<String>, configurations: BTreeMap<String, String>) -> Self {
        Self {
            script: script.into(),
            configurations,
            ..Self::default()
        }
    }
}
