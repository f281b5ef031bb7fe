//! Error types for the job endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error raised when user text does not name a known enum value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid job type '{0}'; expected USql or Hive")]
    JobType(String),

    #[error("invalid compile mode '{0}'; expected Semantic, Full or SingleBox")]
    CompileMode(String),
}

/// Error envelope returned by the service on non-2xx responses.
///
/// ```json
/// { "error": { "code": "JobNotFound", "message": "..." } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudError {
    pub error: CloudErrorBody,
}

/// The body of a [`CloudError`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudErrorBody {
    /// Stable error code, used for automation.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// The target of the error (usually a field or resource name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Nested error details.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<CloudErrorBody>,
}

impl CloudError {
    /// Create a new cloud error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: CloudErrorBody {
                code: code.into(),
                message: message.into(),
                target: None,
                details: Vec::new(),
            },
        }
    }

    /// Parse a response body, returning `None` if it is not a cloud error.
    pub fn from_body(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}

impl fmt::Display for CloudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error.code, self.error.message)?;
        if let Some(ref target) = self.error.target {
            write!(f, " (target: {})", target)?;
        }
        Ok(())
    }
}
