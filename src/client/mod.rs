//! Analytics Service Client
//!
//! The seam between job submission and the remote analytics service:
//! - AnalyticsClient trait: the two job operations the submitter needs
//! - HttpAnalyticsClient: blocking REST client for production
//! - MockAnalyticsClient: in-process recorder for tests

pub mod http;
pub mod mock;

use adl_protocol::{CloudError, JobInformation};

pub use http::HttpAnalyticsClient;
pub use mock::{MockAnalyticsClient, RecordedCall};

/// Remote job operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Compile the job without executing it
    Build,
    /// Compile and execute the job
    Submit,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Build => "build",
            Operation::Submit => "submit",
        }
    }
}

/// Client errors
///
/// These are surfaced to the caller unchanged; nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Service returned HTTP {status}: {code}: {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Failed to decode service response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl ClientError {
    /// Service error carrying the code and message of a cloud error body
    pub fn from_cloud(status: u16, err: CloudError) -> Self {
        ClientError::Service {
            status,
            code: err.error.code,
            message: err.error.message,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Operations on an analytics account.
///
/// Both calls take ownership of the locally built job and return the
/// service's authoritative copy of it.
pub trait AnalyticsClient: Send + Sync {
    /// Compile the job without executing it
    fn build(&self, account: &str, job: JobInformation) -> ClientResult<JobInformation>;

    /// Compile and execute the job
    fn submit(&self, account: &str, job: JobInformation) -> ClientResult<JobInformation>;
}
