//! Blocking client for the accounts resource API.
//!
//! # Overview
//! Creates, fetches and deletes accounts under
//! `/v1/organisation/accounts`. Every call is one synchronous HTTP
//! round-trip; nothing is retried, cached or paginated.
//!
//! # Design
//! - `Account` is the JSON envelope (`data` + `links`) with sparse encoding.
//! - `AccountClient` is stateless apart from its base address and transport.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit and any
//!   `Transport` can sit between them.
//! - Failures are `Error` variants; server rejections keep their status code
//!   and `error_message` as structured fields.
//!
//! ```no_run
//! use accounts_core::{Account, AccountAttributes, AccountClient};
//!
//! let client = AccountClient::new("http://localhost:8080");
//! let account = Account::new(
//!     "ad27e265-9605-4b4b-a0e5-3003ea9cc4dc",
//!     "eb0bd6f5-c3f5-44b2-b677-acd23cdde73c",
//!     AccountAttributes { country: "GB".into(), ..Default::default() },
//! );
//! let created = client.create(&account)?;
//! let fetched = client.fetch(created.id())?;
//! client.delete(fetched.id(), fetched.version())?;
//! # Ok::<(), accounts_core::Error>(())
//! ```

pub mod account;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;

pub use account::{Account, AccountAttributes, AccountData, Links, ACCOUNT_TYPE};
pub use client::AccountClient;
pub use config::ClientConfig;
pub use error::{ApiError, Error, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
