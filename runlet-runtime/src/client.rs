//! Control-plane protocol client
//!
//! Thin HTTP binding to the four runtime endpoints. The client owns header
//! and body encoding; failure policy (log-and-continue versus fatal) belongs
//! to the caller, which is why every report operation returns a `Result`
//! instead of swallowing transport errors itself.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::error::ErrorDescriptor;

pub const REQUEST_ID_HEADER: &str = "Lambda-Runtime-Aws-Request-Id";
pub const DEADLINE_HEADER: &str = "Lambda-Runtime-Deadline-Ms";
pub const FUNCTION_ARN_HEADER: &str = "Lambda-Runtime-Invoked-Function-Arn";
pub const TRACE_ID_HEADER: &str = "Lambda-Runtime-Trace-Id";
pub const ERROR_TYPE_HEADER: &str = "Lambda-Runtime-Function-Error-Type";

/// One unit of work delivered by the control plane.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub request_id: String,
    /// Absolute deadline, epoch milliseconds.
    pub deadline_ms: i64,
    pub invoked_function_arn: String,
    pub trace_id: String,
    pub payload: Value,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("control plane returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("missing or invalid response header {0}")]
    InvalidHeader(&'static str),

    #[error("invalid invocation payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("control plane returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to encode response payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// HTTP client for the runtime protocol
pub struct RuntimeApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl RuntimeApiClient {
    /// Create a client for the given base URL.
    ///
    /// No request timeout is configured: `/invocation/next` is a long poll
    /// and the control plane holds the connection open until work arrives.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// GET `/invocation/next`
    ///
    /// The loop's sole long-suspension point. Decodes the four required
    /// headers and the JSON body into an [`Invocation`].
    pub async fn next_invocation(&self) -> Result<Invocation, FetchError> {
        let url = format!("{}/invocation/next", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let request_id = required_header(&response, REQUEST_ID_HEADER)?;
        let deadline_ms = required_header(&response, DEADLINE_HEADER)?
            .parse::<i64>()
            .map_err(|_| FetchError::InvalidHeader(DEADLINE_HEADER))?;
        let invoked_function_arn = required_header(&response, FUNCTION_ARN_HEADER)?;
        let trace_id = required_header(&response, TRACE_ID_HEADER)?;

        let body = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&body)?;

        debug!(request_id = %request_id, deadline_ms, "received invocation");

        Ok(Invocation {
            request_id,
            deadline_ms,
            invoked_function_arn,
            trace_id,
            payload,
        })
    }

    /// POST `/init/error`
    ///
    /// Used on the fatal cold-start path before the host exits.
    pub async fn report_init_error(
        &self,
        descriptor: &ErrorDescriptor,
    ) -> Result<(), ReportError> {
        let url = format!("{}/init/error", self.base_url);
        self.post_error(&url, descriptor).await
    }

    /// POST `/invocation/{request_id}/error`
    pub async fn report_invocation_error(
        &self,
        request_id: &str,
        descriptor: &ErrorDescriptor,
    ) -> Result<(), ReportError> {
        let url = format!("{}/invocation/{}/error", self.base_url, request_id);
        self.post_error(&url, descriptor).await
    }

    /// POST `/invocation/{request_id}/response`
    ///
    /// `None` (the handler returned nothing) posts an empty body; the
    /// control plane treats that as a legal success.
    pub async fn report_invocation_response(
        &self,
        request_id: &str,
        response: Option<&Value>,
    ) -> Result<(), ReportError> {
        let url = format!("{}/invocation/{}/response", self.base_url, request_id);

        let body = match response {
            Some(value) => serde_json::to_vec(value)?,
            None => Vec::new(),
        };

        let result = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        check_report_status(result).await
    }

    async fn post_error(
        &self,
        url: &str,
        descriptor: &ErrorDescriptor,
    ) -> Result<(), ReportError> {
        let result = self
            .client
            .post(url)
            .header(ERROR_TYPE_HEADER, &descriptor.error_type)
            .json(descriptor)
            .send()
            .await?;

        check_report_status(result).await
    }
}

fn required_header(
    response: &reqwest::Response,
    name: &'static str,
) -> Result<String, FetchError> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
        .ok_or(FetchError::InvalidHeader(name))
}

async fn check_report_status(response: reqwest::Response) -> Result<(), ReportError> {
    let status = response.status();
    if status.is_success() {
        debug!(status = %status, "report accepted");
        Ok(())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ReportError::Status { status, body })
    }
}
