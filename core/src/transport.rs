//! Blocking execution of `HttpRequest` values.

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one request and returns the response with its body read.
///
/// Implementations must hand back every status code as data. Only failures
/// to send the request or read the response are errors.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// `Transport` backed by a shared `ureq::Agent`, which pools connections.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = request.url.as_str();
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), request).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), request).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), request).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), request).send_empty(),
        };
        let mut response = result.map_err(Error::transport)?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(Error::transport)?;
        Ok(HttpResponse { status, body })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    request: &HttpRequest,
) -> ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
