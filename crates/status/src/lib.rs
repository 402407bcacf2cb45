//! # Credential Status
//!
//! Support for reading the revocation status of a W3C Verifiable Credential
//! from the status list credential it references.
//!
//! The `status` crate understands the status entry types used by VC API
//! implementations under test (`StatusList2021Entry`,
//! `BitstringStatusListEntry`, and the older `RevocationList2020Status`) and
//! decodes the GZIP-compressed bitstring carried in a status list
//! credential's `encodedList`. It never encodes or publishes lists: that is
//! the job of the implementations being tested.

mod error;
mod fetch;
mod list;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use self::error::*;
pub use self::fetch::*;
pub use self::list::*;

/// Result type for status operations.
pub type Result<T> = anyhow::Result<T, Error>;

/// A credential's status entry, as found in its `credentialStatus` property.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum CredentialStatus {
    /// A W3C Status List 2021 entry.
    #[serde(rename = "StatusList2021Entry")]
    StatusList2021(StatusListEntry),

    /// A W3C Bitstring Status List entry (the successor to Status List 2021).
    #[serde(rename = "BitstringStatusListEntry")]
    BitstringStatusList(StatusListEntry),

    /// A Revocation List 2020 entry.
    #[serde(rename = "RevocationList2020Status")]
    RevocationList2020(RevocationListEntry),
}

impl CredentialStatus {
    /// Find the first supported status entry in the credential's
    /// `credentialStatus` property, which may be a single object or an array.
    ///
    /// # Errors
    ///
    /// Returns an error when the credential has no `credentialStatus` or none
    /// of its entries is supported.
    pub fn from_credential(vc: &Value) -> Result<Self> {
        let Some(status) = vc.get("credentialStatus") else {
            return Err(Error::MissingStatus);
        };

        match status {
            Value::Array(entries) => {
                let mut last_err = Error::MissingStatus;
                for entry in entries {
                    match Self::from_entry(entry) {
                        Ok(status) => return Ok(status),
                        Err(e) => last_err = e,
                    }
                }
                Err(last_err)
            }
            Value::Null => Err(Error::MissingStatus),
            entry => Self::from_entry(entry),
        }
    }

    fn from_entry(entry: &Value) -> Result<Self> {
        let type_ = entry.get("type").and_then(Value::as_str).unwrap_or("<untyped>");
        serde_json::from_value(entry.clone())
            .map_err(|e| Error::UnsupportedStatus(format!("{type_}: {e}")))
    }

    /// The entry's `type` value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::StatusList2021(_) => "StatusList2021Entry",
            Self::BitstringStatusList(_) => "BitstringStatusListEntry",
            Self::RevocationList2020(_) => "RevocationList2020Status",
        }
    }

    /// The position of the credential in the status list.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::StatusList2021(e) | Self::BitstringStatusList(e) => e.status_list_index,
            Self::RevocationList2020(e) => e.revocation_list_index,
        }
    }

    /// URL of the status list credential holding the credential's status.
    #[must_use]
    pub fn list_credential(&self) -> &str {
        match self {
            Self::StatusList2021(e) | Self::BitstringStatusList(e) => &e.status_list_credential,
            Self::RevocationList2020(e) => &e.revocation_list_credential,
        }
    }
}

/// A status list entry (`StatusList2021Entry` or `BitstringStatusListEntry`).
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusListEntry {
    /// Identifier of the status entry, typically the list URL plus a
    /// fragment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Purpose of the status list, e.g. `revocation` or `suspension`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_purpose: Option<String>,

    /// Position of the credential in the status list.
    #[serde(with = "list_index")]
    pub status_list_index: usize,

    /// URL of the status list credential.
    pub status_list_credential: String,
}

/// A `RevocationList2020Status` entry.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RevocationListEntry {
    /// Identifier of the status entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Position of the credential in the revocation list.
    #[serde(with = "list_index")]
    pub revocation_list_index: usize,

    /// URL of the revocation list credential.
    pub revocation_list_credential: String,
}

/// List indices are serialized as decimal strings. Numbers are accepted on
/// input since some implementations emit them.
mod list_index {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Index {
        Text(String),
        Number(u64),
    }

    pub fn serialize<S: Serializer>(index: &usize, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&index.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
        match Index::deserialize(deserializer)? {
            Index::Text(s) => s
                .trim()
                .parse::<usize>()
                .map_err(|_| D::Error::custom(format!("invalid list index: {s:?}"))),
            Index::Number(n) => usize::try_from(n).map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn status_list_2021_entry() {
        let vc = json!({
            "id": "urn:uuid:4f1d1f5c-8c1e-4b6e-9b4f-1a0f0e9d7c2a",
            "credentialStatus": {
                "id": "https://example.com/status/1#94567",
                "type": "StatusList2021Entry",
                "statusPurpose": "revocation",
                "statusListIndex": "94567",
                "statusListCredential": "https://example.com/status/1"
            }
        });

        let status = CredentialStatus::from_credential(&vc).expect("should parse");
        assert_eq!(status.type_name(), "StatusList2021Entry");
        assert_eq!(status.index(), 94567);
        assert_eq!(status.list_credential(), "https://example.com/status/1");
    }

    #[test]
    fn numeric_index() {
        let vc = json!({
            "credentialStatus": {
                "type": "BitstringStatusListEntry",
                "statusPurpose": "revocation",
                "statusListIndex": 7,
                "statusListCredential": "https://example.com/status/2"
            }
        });

        let status = CredentialStatus::from_credential(&vc).expect("should parse");
        assert_eq!(status.index(), 7);
    }

    #[test]
    fn first_supported_in_array() {
        let vc = json!({
            "credentialStatus": [
                {"type": "CredentialStatusList2017", "id": "https://example.com/status/3"},
                {
                    "type": "RevocationList2020Status",
                    "revocationListIndex": "12",
                    "revocationListCredential": "https://example.com/revocation/1"
                }
            ]
        });

        let status = CredentialStatus::from_credential(&vc).expect("should parse");
        assert_eq!(status.type_name(), "RevocationList2020Status");
        assert_eq!(status.index(), 12);
        assert_eq!(status.list_credential(), "https://example.com/revocation/1");
    }

    #[test]
    fn missing_status() {
        let vc = json!({"id": "urn:uuid:1"});
        let err = CredentialStatus::from_credential(&vc).expect_err("should fail");
        assert!(matches!(err, Error::MissingStatus));
    }

    #[test]
    fn unsupported_status() {
        let vc = json!({"credentialStatus": {"type": "CredentialStatusList2017"}});
        let err = CredentialStatus::from_credential(&vc).expect_err("should fail");
        assert!(matches!(err, Error::UnsupportedStatus(_)));
    }

    #[test]
    fn bad_index() {
        let vc = json!({
            "credentialStatus": {
                "type": "StatusList2021Entry",
                "statusListIndex": "-1",
                "statusListCredential": "https://example.com/status/1"
            }
        });
        let err = CredentialStatus::from_credential(&vc).expect_err("should fail");
        assert!(matches!(err, Error::UnsupportedStatus(_)));
    }

    #[test]
    fn index_serializes_as_string() {
        let status = CredentialStatus::StatusList2021(StatusListEntry {
            id: None,
            status_purpose: Some("revocation".into()),
            status_list_index: 3,
            status_list_credential: "https://example.com/status/1".into(),
        });
        let value = serde_json::to_value(&status).expect("should serialize");
        assert_eq!(
            value,
            json!({
                "type": "StatusList2021Entry",
                "statusPurpose": "revocation",
                "statusListIndex": "3",
                "statusListCredential": "https://example.com/status/1"
            })
        );
    }
}
