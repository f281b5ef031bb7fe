//! REST client for the job endpoints.
//!
//! Blocking: one request per call, no retries. Timeouts come from
//! [`ClientConfig`].

use std::time::Duration;

use adl_protocol::{CloudError, JobInformation};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use uuid::Uuid;

use super::{AnalyticsClient, ClientError, ClientResult, Operation};
use crate::config::ClientConfig;

const BUILD_PATH: &str = "buildJob";
const JOBS_PATH: &str = "jobs";

/// HTTP-backed analytics client
pub struct HttpAnalyticsClient {
    client: Client,
    config: ClientConfig,
}

impl HttpAnalyticsClient {
    /// Build a client from the effective configuration.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("adl-job/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    /// `{scheme}://{account}.{suffix}/`
    pub fn account_url(&self, account: &str) -> ClientResult<Url> {
        if account.is_empty()
            || !account.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ClientError::InvalidEndpoint(format!(
                "account name '{}' is not a valid host label",
                account
            )));
        }

        let endpoint = &self.config.endpoint;
        let raw = format!("{}://{}.{}/", endpoint.scheme, account, endpoint.suffix);
        Url::parse(&raw).map_err(|e| ClientError::InvalidEndpoint(format!("{}: {}", raw, e)))
    }

    /// Target URL for an operation, including the api-version query.
    pub fn operation_url(&self, op: Operation, account: &str, job_id: Uuid) -> ClientResult<Url> {
        let path = match op {
            Operation::Build => BUILD_PATH.to_string(),
            Operation::Submit => format!("{}/{}", JOBS_PATH, job_id),
        };

        let mut url = self
            .account_url(account)?
            .join(&path)
            .map_err(|e| ClientError::InvalidEndpoint(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("api-version", &self.config.endpoint.api_version);
        Ok(url)
    }

    fn send(&self, op: Operation, account: &str, job: &JobInformation) -> ClientResult<JobInformation> {
        let url = self.operation_url(op, account, job.job_id)?;
        tracing::debug!(op = op.as_str(), %url, "sending job request");

        let request = match op {
            Operation::Build => self.client.post(url),
            Operation::Submit => self.client.put(url),
        };

        let response = self.authorize(request).json(job).send()?;
        decode_response(response)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.access_token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl AnalyticsClient for HttpAnalyticsClient {
    fn build(&self, account: &str, job: JobInformation) -> ClientResult<JobInformation> {
        self.send(Operation::Build, account, &job)
    }

    fn submit(&self, account: &str, job: JobInformation) -> ClientResult<JobInformation> {
        self.send(Operation::Submit, account, &job)
    }
}

fn decode_response(response: Response) -> ClientResult<JobInformation> {
    let status = response.status();
    let body = response.text()?;

    if status.is_success() {
        Ok(serde_json::from_str(&body)?)
    } else {
        Err(service_error(status.as_u16(), &body))
    }
}

/// Map a non-2xx response body to [`ClientError::Service`].
///
/// Bodies that are not a cloud error envelope keep their raw text.
pub(crate) fn service_error(status: u16, body: &str) -> ClientError {
    let err = CloudError::from_body(body).unwrap_or_else(|| CloudError::new("Unknown", body.trim()));
    ClientError::from_cloud(status, err)
}
