//! Job submission
//!
//! Validates a [`SubmitRequest`], resolves its script, builds the typed
//! properties, assigns an identifier and hands the resulting
//! [`JobInformation`] to an [`AnalyticsClient`]. Every local check runs before
//! the remote call.

mod dispatch;
mod error;
mod id;
mod properties;
mod script;

use std::collections::BTreeMap;
use std::path::PathBuf;

use adl_protocol::{JobInformation, JobType, DEFAULT_DEGREE_OF_PARALLELISM, DEFAULT_PRIORITY};
use chrono::Local;

use crate::client::AnalyticsClient;

pub use dispatch::{dispatch, ensure_dispatchable, operation_for};
pub use error::{FailureKind, SubmitError};
pub use id::{JobIdSource, PendingJobIds, RandomJobIds};
pub use properties::{build_properties, BuiltProperties, PropertyOptions, USQL_CONFIGURATIONS_WARNING};
pub use script::ScriptLoader;

/// Where the script text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    Inline(String),
    Path(PathBuf),
}

/// A job submission as given on the command line.
///
/// The script and script path are mutually exclusive; exactly one must be
/// non-empty. [`SubmitRequest::validate`] enforces this.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    /// Analytics account the job is submitted under
    pub account: String,
    /// Friendly name of the job
    pub name: String,
    /// Job type as typed by the user (`USql` or `Hive`)
    pub job_type: String,
    pub script: Option<String>,
    pub script_path: Option<PathBuf>,
    pub runtime: Option<String>,
    pub compile_mode: Option<String>,
    pub compile_only: bool,
    pub degree_of_parallelism: i32,
    pub priority: i32,
    /// Custom configurations (Hive only)
    pub configurations: BTreeMap<String, String>,
}

impl SubmitRequest {
    /// A request with neither script source set and default tuning
    pub fn new(account: impl Into<String>, name: impl Into<String>, job_type: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            name: name.into(),
            job_type: job_type.into(),
            script: None,
            script_path: None,
            runtime: None,
            compile_mode: None,
            compile_only: false,
            degree_of_parallelism: DEFAULT_DEGREE_OF_PARALLELISM,
            priority: DEFAULT_PRIORITY,
            configurations: BTreeMap::new(),
        }
    }

    /// A request carrying its script inline
    pub fn inline(
        account: impl Into<String>,
        name: impl Into<String>,
        job_type: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self::new(account, name, job_type).with_script(script)
    }

    /// A request reading its script from `path`
    pub fn from_file(
        account: impl Into<String>,
        name: impl Into<String>,
        job_type: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self::new(account, name, job_type).with_script_path(path)
    }

    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    pub fn with_script_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.script_path = Some(path.into());
        self
    }

    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = Some(runtime.into());
        self
    }

    pub fn with_compile_mode(mut self, mode: impl Into<String>) -> Self {
        self.compile_mode = Some(mode.into());
        self
    }

    pub fn compile_only(mut self, compile_only: bool) -> Self {
        self.compile_only = compile_only;
        self
    }

    pub fn with_degree_of_parallelism(mut self, degree: i32) -> Self {
        self.degree_of_parallelism = degree;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_configuration(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.configurations.insert(key.into(), value.into());
        self
    }

    /// Check the request and pick the script source.
    ///
    /// Empty strings count as not supplied.
    pub fn validate(&self) -> Result<ScriptSource, SubmitError> {
        let script = self.script.as_deref().filter(|s| !s.is_empty());
        let path = self
            .script_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty());

        let source = match (script, path) {
            (Some(text), None) => ScriptSource::Inline(text.to_string()),
            (None, Some(path)) => ScriptSource::Path(path.to_path_buf()),
            (Some(_), Some(_)) | (None, None) => return Err(SubmitError::AmbiguousInput),
        };

        if self.account.trim().is_empty() {
            return Err(invalid("account", "must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(invalid("name", "must not be empty"));
        }
        if self.degree_of_parallelism < 1 {
            return Err(invalid(
                "degree_of_parallelism",
                format!("must be at least 1, got {}", self.degree_of_parallelism),
            ));
        }
        if self.priority < 1 {
            return Err(invalid("priority", format!("must be at least 1, got {}", self.priority)));
        }

        Ok(source)
    }

    /// Parse the job type text
    pub fn parsed_job_type(&self) -> Result<JobType, SubmitError> {
        self.job_type
            .parse()
            .map_err(|_| SubmitError::InvalidJobType(self.job_type.clone()))
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SubmitError {
    SubmitError::InvalidArgument {
        field,
        reason: reason.into(),
    }
}

/// Outcome of a successful submission
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// The job as returned by the service
    pub job: JobInformation,
    /// Whether the job was only compiled
    pub compile_only: bool,
    /// Non-fatal warnings raised while preparing the job
    pub warnings: Vec<String>,
}

impl Submission {
    /// Render for terminal output
    pub fn to_human(&self) -> String {
        let job = &self.job;
        let mut lines = vec![
            format!(
                "{} job '{}' ({})",
                if self.compile_only { "Compiled" } else { "Submitted" },
                job.name,
                job.job_id
            ),
            format!("  Type: {}", job.job_type),
        ];
        if let Some(runtime) = job.properties.runtime_version() {
            lines.push(format!("  Runtime: {}", runtime));
        }
        lines.push(format!("  Degree of parallelism: {}", job.degree_of_parallelism));
        lines.push(format!("  Priority: {}", job.priority));
        if let Some(ref submitter) = job.submitter {
            lines.push(format!("  Submitter: {}", submitter));
        }
        if let Some(state) = job.state {
            lines.push(format!("  State: {:?}", state));
        }
        if let Some(result) = job.result {
            lines.push(format!("  Result: {:?}", result));
        }
        if let Some(submit_time) = job.submit_time {
            lines.push(format!(
                "  Submitted at: {}",
                submit_time.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S %Z")
            ));
        }
        if let Some(ref message) = job.error_message {
            lines.push(format!("  Error: {}", message));
        }
        lines.join("\n")
    }
}

/// Prepares and dispatches jobs against one client
pub struct JobSubmitter<'a> {
    client: &'a dyn AnalyticsClient,
    loader: ScriptLoader,
}

impl<'a> JobSubmitter<'a> {
    pub fn new(client: &'a dyn AnalyticsClient) -> Self {
        Self {
            client,
            loader: ScriptLoader::new(),
        }
    }

    /// Resolve script paths with `loader` instead of the working directory
    pub fn with_loader(mut self, loader: ScriptLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Validate, prepare and dispatch `request`.
    ///
    /// An identifier is drawn from `ids` once the script and properties are
    /// ready; a job rejected at dispatch has still consumed it.
    pub fn submit(&self, request: &SubmitRequest, ids: &mut dyn JobIdSource) -> Result<Submission, SubmitError> {
        let source = request.validate()?;
        let job_type = request.parsed_job_type()?;

        let script = match source {
            ScriptSource::Inline(text) => text,
            ScriptSource::Path(path) => self.loader.load(&path)?,
        };

        let configurations = (!request.configurations.is_empty()).then_some(&request.configurations);
        let BuiltProperties { properties, warnings } = build_properties(
            job_type,
            script,
            PropertyOptions {
                runtime: request.runtime.as_deref(),
                compile_mode: request.compile_mode.as_deref(),
                configurations,
            },
        );

        let job_id = ids.next_job_id();
        tracing::debug!(%job_id, "assigned job id");

        let job = JobInformation::new(
            job_id,
            request.name.clone(),
            properties,
            request.degree_of_parallelism,
            request.priority,
        );

        let job = dispatch(self.client, &request.account, job, request.compile_only)?;
        Ok(Submission {
            job,
            compile_only: request.compile_only,
            warnings,
        })
    }
}

/// Submit `request` through `client`, resolving script paths against the
/// working directory.
pub fn submit_job(
    request: &SubmitRequest,
    ids: &mut dyn JobIdSource,
    client: &dyn AnalyticsClient,
) -> Result<Submission, SubmitError> {
    JobSubmitter::new(client).submit(request, ids)
}
