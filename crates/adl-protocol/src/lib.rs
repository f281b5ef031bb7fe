//! ADL Protocol Types
//!
//! Defines the JSON bodies exchanged with the analytics service's job
//! endpoints (`PUT /jobs/{jobId}` and `POST /buildJob`).

pub mod error;
pub mod job;
pub mod properties;

pub use error::{CloudError, CloudErrorBody, ParseError};
pub use job::{CompileMode, JobInformation, JobResult, JobState, JobType};
pub use properties::{HiveJobProperties, JobProperties, USqlJobProperties};

/// REST api-version understood by the job endpoints.
pub const DEFAULT_API_VERSION: &str = "2016-11-01";

/// DNS suffix of the public cloud job endpoint.
pub const DEFAULT_ENDPOINT_SUFFIX: &str = "azuredatalakeanalytics.net";

/// Default degree of parallelism for a new job.
pub const DEFAULT_DEGREE_OF_PARALLELISM: i32 = 1;

/// Default priority for a new job (1 = highest, 1000 = lowest).
pub const DEFAULT_PRIORITY: i32 = 1000;
