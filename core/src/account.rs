//! Account resource model and its JSON wire form.
//!
//! # Design
//! The envelope mirrors the remote API: a `data` section carrying identity
//! and `attributes`, and a `links` section the server fills in. Encoding is
//! sparse: empty strings, zero versions, `false` flags and all-empty name
//! lists are left out of the output rather than sent as defaults. Decoding
//! is lenient: unknown keys are ignored and missing or `null` keys take their
//! zero value, so a server-side schema addition does not break the client.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Resource type literal the API requires on every account.
pub const ACCOUNT_TYPE: &str = "accounts";

/// A single account as exchanged with the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, deserialize_with = "null_default")]
    pub data: AccountData,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

/// Identity, versioning and attributes of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub organisation_id: String,
    #[serde(rename = "type", default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Optimistic-concurrency token; must match the server's on delete.
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "is_zero")]
    pub version: i64,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub created_on: String,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub modified_on: String,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "AccountAttributes::is_empty")]
    pub attributes: AccountAttributes,
}

/// Domain fields of an account.
///
/// `name` and `alternative_names` are positional: the API accepts up to four
/// name lines and three alternative names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAttributes {
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub base_currency: String,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub bank_id: String,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub bank_id_code: String,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub account_number: String,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub bic: String,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub iban: String,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub customer_id: String,
    #[serde(
        default,
        with = "slots",
        skip_serializing_if = "slots::is_empty"
    )]
    pub name: [String; 4],
    #[serde(
        default,
        with = "slots",
        skip_serializing_if = "slots::is_empty"
    )]
    pub alternative_names: [String; 3],
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub account_classification: String,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "is_false")]
    pub joint_account: bool,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "is_false")]
    pub account_matching_opt_out: bool,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub secondary_identification: String,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "is_false")]
    pub switched: bool,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub status: String,
}

/// Hypermedia links returned by the server. Never followed by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self", default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub self_link: String,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub first: String,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub last: String,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub next: String,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub prev: String,
}

impl Account {
    /// Build an account ready to be sent to `create`: resource type set,
    /// version zero, no server-assigned fields.
    pub fn new(
        id: impl Into<String>,
        organisation_id: impl Into<String>,
        attributes: AccountAttributes,
    ) -> Self {
        Self {
            data: AccountData {
                id: id.into(),
                organisation_id: organisation_id.into(),
                kind: ACCOUNT_TYPE.to_string(),
                attributes,
                ..AccountData::default()
            },
            links: Links::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }

    pub fn version(&self) -> i64 {
        self.data.version
    }

    /// Encode as the JSON envelope sent on the wire.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::Encoding)
    }

    /// Decode an account from a JSON envelope.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(Error::Decoding)
    }
}

impl AccountAttributes {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Links {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Treat an explicit `null` like a missing key.
fn null_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Fixed-width string lists. Short or `null` input is padded with empty
/// strings, long input is truncated.
mod slots {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn is_empty<const N: usize>(slots: &[String; N]) -> bool {
        slots.iter().all(String::is_empty)
    }

    pub fn serialize<S, const N: usize>(slots: &[String; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        slots.as_slice().serialize(serializer)
    }

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[String; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut values = Option::<Vec<String>>::deserialize(deserializer)?
            .unwrap_or_default()
            .into_iter();
        Ok(std::array::from_fn(|_| values.next().unwrap_or_default()))
    }
}
