//! Job information and the enums it carries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ParseError;
use crate::properties::JobProperties;

/// Kind of script a job runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    /// U-SQL script
    USql,
    /// Hive script
    Hive,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::USql => "USql",
            JobType::Hive => "Hive",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usql" | "u-sql" => Ok(JobType::USql),
            "hive" => Ok(JobType::Hive),
            _ => Err(ParseError::JobType(s.to_string())),
        }
    }
}

/// Compilation performed for a U-SQL job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompileMode {
    /// Semantic checks and necessary sanity checks only
    Semantic,
    /// Full compilation
    Full,
    /// Full compilation performed locally
    SingleBox,
}

impl CompileMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompileMode::Semantic => "Semantic",
            CompileMode::Full => "Full",
            CompileMode::SingleBox => "SingleBox",
        }
    }
}

impl fmt::Display for CompileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompileMode {
    type Err = ParseError;

    /// Names are matched exactly, the way the service spells them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Semantic" => Ok(CompileMode::Semantic),
            "Full" => Ok(CompileMode::Full),
            "SingleBox" => Ok(CompileMode::SingleBox),
            _ => Err(ParseError::CompileMode(s.to_string())),
        }
    }
}

/// Server-side job state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Accepted,
    Compiling,
    Ended,
    New,
    Queued,
    Running,
    Scheduling,
    Starting,
    Paused,
    WaitingForCapacity,
    Yielded,
    Finalizing,
}

/// Server-side job result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobResult {
    None,
    Succeeded,
    Cancelled,
    Failed,
}

/// A job as sent to and returned by the service.
///
/// The optional fields are populated by the service and are omitted from
/// outbound bodies when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInformation {
    /// Caller-chosen job identifier
    pub job_id: Uuid,

    /// Friendly name of the job
    pub name: String,

    /// Job type; always matches the properties variant for jobs built locally
    #[serde(rename = "type")]
    pub job_type: JobType,

    pub degree_of_parallelism: i32,

    pub priority: i32,

    pub properties: JobProperties,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<JobState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl JobInformation {
    /// Create a job ready to send. The job type is taken from the properties.
    pub fn new(
        job_id: Uuid,
        name: impl Into<String>,
        properties: JobProperties,
        degree_of_parallelism: i32,
        priority: i32,
    ) -> Self {
        Self {
            job_id,
            name: name.into(),
            job_type: properties.job_type(),
            degree_of_parallelism,
            priority,
            properties,
            submitter: None,
            state: None,
            result: None,
            submit_time: None,
            start_time: None,
            end_time: None,
            error_message: None,
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::{HiveJobProperties, USqlJobProperties};
    use serde_json::json;

    #[test]
    fn test_job_type_from_str() {
        assert_eq!("USql".parse::<JobType>().unwrap(), JobType::USql);
        assert_eq!("usql".parse::<JobType>().unwrap(), JobType::USql);
        assert_eq!("U-SQL".parse::<JobType>().unwrap(), JobType::USql);
        assert_eq!(" Hive ".parse::<JobType>().unwrap(), JobType::Hive);
        assert_eq!(
            "Scope".parse::<JobType>(),
            Err(ParseError::JobType("Scope".to_string()))
        );
    }

    #[test]
    fn test_compile_mode_is_case_sensitive() {
        assert_eq!("Full".parse::<CompileMode>().unwrap(), CompileMode::Full);
        assert_eq!("SingleBox".parse::<CompileMode>().unwrap(), CompileMode::SingleBox);
        assert!("full".parse::<CompileMode>().is_err());
        assert!("garbage".parse::<CompileMode>().is_err());
    }

    #[test]
    fn test_outbound_body_omits_server_fields() {
        let id = Uuid::parse_str("6c8c3c4e-8f6b-4f53-9a57-1b1e8d8d2f10").unwrap();
        let job = JobInformation::new(
            id,
            "nightly",
            JobProperties::USql(USqlJobProperties::new("SELECT 1;")),
            4,
            100,
        );

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["jobId"], "6c8c3c4e-8f6b-4f53-9a57-1b1e8d8d2f10");
        assert_eq!(value["type"], "USql");
        assert_eq!(value["degreeOfParallelism"], 4);
        assert_eq!(value["properties"]["type"], "USql");
        assert!(value.get("state").is_none());
        assert!(value.get("submitTime").is_none());
    }

    #[test]
    fn test_parse_service_response() {
        let body = json!({
            "jobId": "6c8c3c4e-8f6b-4f53-9a57-1b1e8d8d2f10",
            "name": "hive-nightly",
            "type": "Hive",
            "submitter": "someone@example.com",
            "degreeOfParallelism": 1,
            "priority": 1000,
            "submitTime": "2026-10-19T08:00:00Z",
            "state": "Accepted",
            "result": "None",
            "properties": {
                "type": "Hive",
                "script": "SHOW TABLES;",
                "configurations": {"hive.exec.parallel": "true"},
                "statementCount": 1
            }
        });

        let job: JobInformation = serde_json::from_value(body).unwrap();
        assert_eq!(job.job_type, JobType::Hive);
        assert_eq!(job.state, Some(JobState::Accepted));
        assert_eq!(job.result, Some(JobResult::None));
        assert!(job.submit_time.is_some());
        match job.properties {
            JobProperties::Hive(HiveJobProperties { ref configurations, statement_count, .. }) => {
                assert_eq!(configurations["hive.exec.parallel"], "true");
                assert_eq!(statement_count, Some(1));
            }
            _ => panic!("expected hive properties"),
        }
    }
}
