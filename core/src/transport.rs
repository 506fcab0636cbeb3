//! The I/O seam between request construction and response processing.
//!
//! `ApiClient` never opens a socket itself. It hands each `HttpRequest` to a
//! `Transport` and feeds the returned body to `process_response`. The default
//! `UreqTransport` is a blocking `ureq` agent; any closure with the right
//! signature works as well, which is how the unit tests observe requests.

use ureq::tls::TlsConfig;
use ureq::Agent;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes a single HTTP round-trip.
///
/// Implementations must return the body for every HTTP status; only failures
/// to obtain a body at all (DNS, connect, TLS, read) are errors, reported as
/// `ApiError::Connection`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    /// Build an agent honoring the TLS and timeout settings in `config`.
    pub fn new(config: &ClientConfig) -> Self {
        if config.insecure_skip_verify() {
            tracing::warn!(
                base_url = config.base_url(),
                "TLS certificate verification is disabled"
            );
        }

        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout())
            .tls_config(
                TlsConfig::builder()
                    .disable_verification(config.insecure_skip_verify())
                    .build(),
            )
            .build()
            .new_agent();

        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut response = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => {
                let mut builder = self.agent.get(&request.url);
                for (key, value) in &request.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                builder.call()
            }
            (HttpMethod::Post, body) => {
                let mut builder = self.agent.post(&request.url);
                for (key, value) in &request.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        }
        .map_err(ApiError::from)?;

        let status = response.status().as_u16();
        // Full sales reports can exceed ureq's 10 MiB default read cap.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_string()?;
        tracing::debug!(status, body_len = body.len(), "received response");

        Ok(HttpResponse { status, body })
    }
}
