//! ADL Job - Data Lake Analytics job submission
//!
//! This crate submits U-SQL and Hive jobs to a Data Lake Analytics account,
//! either compiling them only (build) or compiling and running them (submit).

pub mod client;
pub mod config;
pub mod job;

pub use adl_protocol::{CompileMode, JobInformation, JobProperties, JobType};
pub use client::{AnalyticsClient, ClientError, HttpAnalyticsClient, MockAnalyticsClient, Operation};
pub use config::{ClientConfig, ConfigError, ConfigOverrides, EffectiveConfig};
pub use job::{
    submit_job, JobIdSource, JobSubmitter, PendingJobIds, RandomJobIds, ScriptLoader, SubmitError,
    SubmitRequest, Submission,
};
