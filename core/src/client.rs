//! HTTP client for the accounts API.
//!
//! # Design
//! `AccountClient` holds only a `base_url` and a `Transport`, and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`; `create`, `fetch` and `delete` run the pair through the
//! transport. The split keeps status classification and decoding testable
//! without a server.

use std::collections::HashMap;

use crate::account::Account;
use crate::config::ClientConfig;
use crate::error::{ApiError, Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};

/// Collection path of the accounts resource.
pub const ACCOUNTS_PATH: &str = "/v1/organisation/accounts";

/// Media type of request bodies sent to the API.
pub const CONTENT_TYPE: &str = "application/vnd.api+json";

/// Blocking client for the accounts API.
#[derive(Debug, Clone)]
pub struct AccountClient<T = UreqTransport> {
    base_url: String,
    transport: T,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AccountClient>();
};

impl AccountClient {
    /// Client using the default `ureq` transport with no timeout override.
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::default())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_transport(&config.base_url, UreqTransport::new(config.timeout))
    }
}

impl<T: Transport> AccountClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create `account` on the server and return the stored record.
    pub fn create(&self, account: &Account) -> Result<Account> {
        let request = self.build_create(account)?;
        self.parse_create(self.execute(&request)?)
    }

    /// Fetch the account with the given identifier.
    ///
    /// An empty identifier is rejected before any request is made, since it
    /// would otherwise address the collection endpoint.
    pub fn fetch(&self, id: &str) -> Result<Account> {
        let request = self.build_fetch(id)?;
        self.parse_fetch(self.execute(&request)?)
    }

    /// Delete the account with the given identifier at `version`.
    ///
    /// The server treats an unknown identifier as already deleted.
    pub fn delete(&self, id: &str, version: i64) -> Result<()> {
        let request = self.build_delete(id, version);
        self.parse_delete(self.execute(&request)?)
    }

    pub fn build_create(&self, account: &Account) -> Result<HttpRequest> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{ACCOUNTS_PATH}", self.base_url),
            headers: vec![("content-type".to_string(), CONTENT_TYPE.to_string())],
            body: Some(account.to_json()?),
        })
    }

    pub fn build_fetch(&self, id: &str) -> Result<HttpRequest> {
        if id.is_empty() {
            return Err(Error::InvalidArgument("identifier is empty".to_string()));
        }
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{ACCOUNTS_PATH}/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn build_delete(&self, id: &str, version: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}{ACCOUNTS_PATH}/{id}?version={version}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Account> {
        check_status(&response, 201)?;
        Account::from_json(&response.body)
    }

    pub fn parse_fetch(&self, response: HttpResponse) -> Result<Account> {
        check_status(&response, 200)?;
        Account::from_json(&response.body)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<()> {
        check_status(&response, 204)
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        tracing::trace!(status = response.status, "received response");
        Ok(response)
    }
}

/// Map a status other than `expected` to `Error::Api`.
///
/// The body is read as a flat object of string fields and only
/// `error_message` is kept. A `null` body carries no message; any other
/// body that is not such an object is reported as a decoding failure.
fn check_status(response: &HttpResponse, expected: u16) -> Result<()> {
    if response.status == expected {
        return Ok(());
    }
    let fields: Option<HashMap<String, String>> =
        serde_json::from_str(&response.body).map_err(Error::Decoding)?;
    let message = fields.and_then(|mut fields| fields.remove("error_message"));
    tracing::debug!(
        status = response.status,
        expected,
        message = message.as_deref().unwrap_or_default(),
        "unexpected response status"
    );
    Err(ApiError {
        status: response.status,
        message,
    }
    .into())
}
