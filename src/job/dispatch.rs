//! Routing a prepared job to the build or submit operation.

use adl_protocol::{JobInformation, JobType};

use super::SubmitError;
use crate::client::{AnalyticsClient, Operation};

/// Reject combinations the service cannot run.
///
/// Compile-only is defined for U-SQL jobs only.
pub fn ensure_dispatchable(job_type: JobType, compile_only: bool) -> Result<(), SubmitError> {
    match (job_type, compile_only) {
        (JobType::Hive, true) => Err(SubmitError::UnsupportedOperation(
            "Hive jobs cannot be compiled without being run; omit the compile-only flag".to_string(),
        )),
        (JobType::Hive, false) | (JobType::USql, _) => Ok(()),
    }
}

/// Operation selected by the compile-only flag
pub fn operation_for(compile_only: bool) -> Operation {
    if compile_only {
        Operation::Build
    } else {
        Operation::Submit
    }
}

/// Send `job` to the build or submit operation.
///
/// Remote failures come back unchanged as [`SubmitError::Remote`].
pub fn dispatch(
    client: &dyn AnalyticsClient,
    account: &str,
    job: JobInformation,
    compile_only: bool,
) -> Result<JobInformation, SubmitError> {
    ensure_dispatchable(job.job_type, compile_only)?;

    let op = operation_for(compile_only);
    tracing::info!(
        op = op.as_str(),
        account,
        job_id = %job.job_id,
        job_type = %job.job_type,
        "dispatching job"
    );

    let returned = match op {
        Operation::Build => client.build(account, job)?,
        Operation::Submit => client.submit(account, job)?,
    };
    Ok(returned)
}
