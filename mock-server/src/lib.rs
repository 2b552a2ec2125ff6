//! In-memory emulator of the accounts API.
//!
//! Reproduces the behaviour the client depends on: request validation with
//! `error_message` bodies, the duplicate-identifier constraint, UUID checks
//! on path identifiers, and version checks on delete.

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const ACCOUNTS_PATH: &str = "/v1/organisation/accounts";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub data: AccountData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<SelfLink>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccountData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub organisation_id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelfLink {
    #[serde(rename = "self")]
    pub self_link: String,
}

#[derive(Deserialize)]
pub struct DeleteParams {
    pub version: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Envelope>>>;

/// A rejected request, rendered as `{"error_message": ...}`.
#[derive(Debug)]
pub struct Rejection {
    pub status: StatusCode,
    pub message: String,
}

impl Rejection {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error_message": self.message }))).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route(ACCOUNTS_PATH, post(create_account))
        .route(
            &format!("{ACCOUNTS_PATH}/{{id}}"),
            get(fetch_account).delete(delete_account),
        )
        .fallback(not_found)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn create_account(
    State(db): State<Db>,
    body: Bytes,
) -> Result<(StatusCode, Json<Envelope>), Rejection> {
    let input: Envelope = serde_json::from_slice(&body)
        .map_err(|e| Rejection::new(StatusCode::BAD_REQUEST, e.to_string()))?;
    let id = validate(&input.data)?;

    let mut accounts = db.write().await;
    if accounts.contains_key(&id) {
        return Err(Rejection::new(
            StatusCode::CONFLICT,
            "Account cannot be created as it violates a duplicate constraint",
        ));
    }

    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let stored = Envelope {
        data: AccountData {
            version: 0,
            created_on: Some(now.clone()),
            modified_on: Some(now),
            ..input.data
        },
        links: Some(SelfLink {
            self_link: format!("{ACCOUNTS_PATH}/{id}"),
        }),
    };
    accounts.insert(id, stored.clone());
    tracing::info!(%id, "account created");
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn fetch_account(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, Rejection> {
    let uuid = parse_path_id(&id)?;
    let accounts = db.read().await;
    accounts.get(&uuid).cloned().map(Json).ok_or_else(|| {
        Rejection::new(StatusCode::NOT_FOUND, format!("record {id} does not exist"))
    })
}

async fn delete_account(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, Rejection> {
    let uuid = parse_path_id(&id)?;
    let version: i64 = params
        .version
        .as_deref()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| Rejection::new(StatusCode::BAD_REQUEST, "invalid version number"))?;

    let mut accounts = db.write().await;
    match accounts.get(&uuid) {
        None => Ok(StatusCode::NO_CONTENT),
        Some(account) if account.data.version != version => {
            Err(Rejection::new(StatusCode::NOT_FOUND, "invalid version"))
        }
        Some(_) => {
            accounts.remove(&uuid);
            tracing::info!(%uuid, version, "account deleted");
            Ok(StatusCode::NO_CONTENT)
        }
    }
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({})))
}

fn parse_path_id(id: &str) -> Result<Uuid, Rejection> {
    Uuid::parse_str(id).map_err(|_| Rejection::new(StatusCode::BAD_REQUEST, "id is not a valid uuid"))
}

/// Check the fields the API requires on create; returns the parsed id.
fn validate(data: &AccountData) -> Result<Uuid, Rejection> {
    let mut failures = Vec::new();

    match data.attributes.get("country").and_then(Value::as_str) {
        None | Some("") => failures.push("country in body is required".to_string()),
        Some(country) if !is_country_code(country) => {
            failures.push("country in body should match '^[A-Z]{2}$'".to_string());
        }
        Some(_) => {}
    }
    let id = check_uuid("id", &data.id, &mut failures);
    check_uuid("organisation_id", &data.organisation_id, &mut failures);
    if data.kind.is_empty() {
        failures.push("type in body is required".to_string());
    } else if data.kind != "accounts" {
        failures.push("type in body should be one of [accounts]".to_string());
    }

    match id {
        Some(id) if failures.is_empty() => Ok(id),
        _ => {
            failures.sort();
            Err(Rejection::new(
                StatusCode::BAD_REQUEST,
                format!("validation failure list:\n{}", failures.join("\n")),
            ))
        }
    }
}

fn check_uuid(field: &str, value: &str, failures: &mut Vec<String>) -> Option<Uuid> {
    if value.is_empty() {
        failures.push(format!("{field} in body is required"));
        return None;
    }
    match Uuid::parse_str(value) {
        Ok(uuid) => Some(uuid),
        Err(_) => {
            failures.push(format!("{field} in body must be of type uuid: \"{value}\""));
            None
        }
    }
}

fn is_country_code(value: &str) -> bool {
    value.len() == 2 && value.bytes().all(|b| b.is_ascii_uppercase())
}
