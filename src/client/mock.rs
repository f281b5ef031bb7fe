//! Mock analytics client
//!
//! Records every call and answers the way the service does for a freshly
//! accepted job. Failures can be injected per operation.

use std::collections::HashMap;
use std::sync::Mutex;

use adl_protocol::{CloudError, JobInformation, JobResult, JobState};
use chrono::Utc;

use super::{AnalyticsClient, ClientError, ClientResult, Operation};

/// A call received by the mock
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub op: Operation,
    pub account: String,
    pub job: JobInformation,
}

#[derive(Debug, Clone)]
struct InjectedFailure {
    status: u16,
    error: CloudError,
}

/// In-process stand-in for the analytics service
pub struct MockAnalyticsClient {
    submitter: String,
    calls: Mutex<Vec<RecordedCall>>,
    failures: Mutex<HashMap<Operation, InjectedFailure>>,
}

impl MockAnalyticsClient {
    pub fn new() -> Self {
        Self::with_submitter("mock@adl.local")
    }

    /// Create a mock that reports the given submitter on returned jobs
    pub fn with_submitter(submitter: impl Into<String>) -> Self {
        Self {
            submitter: submitter.into(),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Make every call to `op` fail with a service error
    pub fn inject_error(
        &self,
        op: Operation,
        status: u16,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.failures.lock().unwrap().insert(
            op,
            InjectedFailure {
                status,
                error: CloudError::new(code, message),
            },
        );
    }

    /// Remove an injected failure
    pub fn clear_error(&self, op: Operation) {
        self.failures.lock().unwrap().remove(&op);
    }

    /// All calls received so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls received for an operation
    pub fn call_count(&self, op: Operation) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.op == op).count()
    }

    fn handle(&self, op: Operation, account: &str, job: JobInformation) -> ClientResult<JobInformation> {
        self.calls.lock().unwrap().push(RecordedCall {
            op,
            account: account.to_string(),
            job: job.clone(),
        });

        if let Some(failure) = self.failures.lock().unwrap().get(&op) {
            return Err(ClientError::from_cloud(failure.status, failure.error.clone()));
        }

        let mut accepted = job;
        accepted.submitter = Some(self.submitter.clone());
        match op {
            Operation::Submit => {
                accepted.state = Some(JobState::Accepted);
                accepted.result = Some(JobResult::None);
                accepted.submit_time = Some(Utc::now());
            }
            Operation::Build => {
                accepted.state = Some(JobState::Ended);
                accepted.result = Some(JobResult::Succeeded);
            }
        }
        Ok(accepted)
    }
}

impl Default for MockAnalyticsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsClient for MockAnalyticsClient {
    fn build(&self, account: &str, job: JobInformation) -> ClientResult<JobInformation> {
        self.handle(Operation::Build, account, job)
    }

    fn submit(&self, account: &str, job: JobInformation) -> ClientResult<JobInformation> {
        self.handle(Operation::Submit, account, job)
    }
}
