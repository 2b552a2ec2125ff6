//! Account operations against the live mock server.
//!
//! # Design
//! Each test starts its own mock server on a random port and drives the
//! real client over HTTP. Accounts a test creates are held in a `Created`
//! guard that deletes them when the test ends, so no scenario depends on
//! state left by another.

use accounts_core::{Account, AccountAttributes, AccountClient, ApiError, ClientConfig, Error};
use std::time::Duration;
use uuid::Uuid;

/// Start the mock server on a random port and return its base URL.
fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn build_account() -> Account {
    Account::new(
        Uuid::new_v4().to_string(),
        Uuid::new_v4().to_string(),
        AccountAttributes {
            country: "GB".to_string(),
            ..AccountAttributes::default()
        },
    )
}

/// An account that exists on the server until the guard is dropped.
struct Created<'a> {
    client: &'a AccountClient,
    account: Account,
}

impl<'a> Created<'a> {
    fn new(client: &'a AccountClient, account: &Account) -> Self {
        let account = client.create(account).unwrap();
        Self { client, account }
    }
}

impl Drop for Created<'_> {
    fn drop(&mut self) {
        let result = self.client.delete(self.account.id(), self.account.version());
        if !std::thread::panicking() {
            result.unwrap();
        }
    }
}

fn api_error(err: Error) -> ApiError {
    match err {
        Error::Api(api) => api,
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[test]
fn create_returns_stored_account() {
    let client = AccountClient::new(&spawn_server());
    let account = build_account();

    let created = Created::new(&client, &account);
    assert_eq!(created.account.id(), account.id());
    assert_eq!(created.account.data.organisation_id, account.data.organisation_id);
    assert_eq!(created.account.data.attributes, account.data.attributes);
    assert_eq!(created.account.version(), 0);
    assert!(!created.account.data.created_on.is_empty());
    assert_eq!(
        created.account.links.self_link,
        format!("/v1/organisation/accounts/{}", account.id())
    );
}

#[test]
fn create_with_duplicate_id_conflicts() {
    let client = AccountClient::new(&spawn_server());
    let first = Created::new(&client, &build_account());

    let mut duplicate = build_account();
    duplicate.data.id = first.account.id().to_string();
    let err = client.create(&duplicate).unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert_eq!(
        err.to_string(),
        "409 Conflict: Account cannot be created as it violates a duplicate constraint"
    );
}

#[test]
fn create_with_empty_account_fails_validation() {
    let client = AccountClient::new(&spawn_server());
    let err = api_error(client.create(&Account::default()).unwrap_err());

    assert_eq!(err.status, 400);
    assert_eq!(
        err.to_string(),
        "400 Bad Request: validation failure list:\n\
         country in body is required\n\
         id in body is required\n\
         organisation_id in body is required\n\
         type in body is required"
    );
}

#[test]
fn fetch_returns_created_account() {
    let client = AccountClient::new(&spawn_server());
    let created = Created::new(&client, &build_account());

    let fetched = client.fetch(created.account.id()).unwrap();
    assert_eq!(fetched.id(), created.account.id());
    assert_eq!(fetched.data.organisation_id, created.account.data.organisation_id);
    assert_eq!(fetched.data.attributes, created.account.data.attributes);
}

#[test]
fn fetch_with_empty_id_is_rejected_locally() {
    // Nothing listens on an empty base URL, so a request would surface as a
    // transport error rather than an invalid argument.
    let client = AccountClient::new("");
    let err = client.fetch("").unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(ref msg) if msg == "identifier is empty"));
}

#[test]
fn fetch_with_invalid_id_is_bad_request() {
    let client = AccountClient::new(&spawn_server());
    let err = api_error(client.fetch("123abc").unwrap_err());
    assert_eq!(err.status, 400);
    assert_eq!(err.to_string(), "400 Bad Request: id is not a valid uuid");
}

#[test]
fn fetch_with_unknown_id_is_not_found() {
    let client = AccountClient::new(&spawn_server());
    let id = Uuid::new_v4().to_string();
    let err = api_error(client.fetch(&id).unwrap_err());
    assert_eq!(err.status, 404);
    assert_eq!(err.message.as_deref(), Some(format!("record {id} does not exist").as_str()));
}

#[test]
fn delete_then_fetch_is_not_found() {
    let client = AccountClient::new(&spawn_server());
    let account = client.create(&build_account()).unwrap();

    client.delete(account.id(), account.version()).unwrap();

    let err = client.fetch(account.id()).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("404 Not Found: record {} does not exist", account.id())
    );
}

#[test]
fn delete_with_wrong_version_is_not_found() {
    let client = AccountClient::new(&spawn_server());
    let created = Created::new(&client, &build_account());

    let err = client
        .delete(created.account.id(), created.account.version() + 1)
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "404 Not Found: invalid version");
}

#[test]
fn delete_unknown_id_succeeds() {
    let client = AccountClient::new(&spawn_server());
    client.delete(&Uuid::new_v4().to_string(), 0).unwrap();
}

#[test]
fn delete_with_invalid_id_is_bad_request() {
    let client = AccountClient::new(&spawn_server());
    let err = client.delete("123abc", 0).unwrap_err();
    assert_eq!(err.to_string(), "400 Bad Request: id is not a valid uuid");
}

#[test]
fn delete_with_empty_id_is_bare_not_found() {
    let client = AccountClient::new(&spawn_server());
    let err = api_error(client.delete("", 0).unwrap_err());
    assert_eq!(err.status, 404);
    assert!(err.message.is_none());
    assert_eq!(err.to_string(), "404 Not Found");
}

#[test]
fn unreachable_server_is_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = AccountClient::from_config(
        &ClientConfig::new(format!("http://{addr}")).with_timeout(Duration::from_secs(5)),
    );
    let err = client.create(&build_account()).unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[test]
fn empty_base_url_is_transport_error() {
    let client = AccountClient::new("");
    let err = client.create(&build_account()).unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}
