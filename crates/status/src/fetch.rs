//! # Status Lookup
//!
//! Dereference a credential's status list credential and read the
//! credential's bit.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::invalid;
use crate::{CredentialStatus, Result, StatusList};

/// The current status of a credential.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfo {
    /// `true` when the status bit is set (i.e. the credential is revoked).
    pub status: bool,

    /// URL of the status list credential the status was read from.
    pub status_list_credential: String,

    /// Position of the credential in the status list.
    pub status_list_index: usize,
}

/// Look up the current status of a credential.
///
/// # Errors
///
/// Returns an error if the credential has no supported status entry, the
/// status list credential cannot be retrieved or decoded, or the index is out
/// of range.
pub async fn fetch_status(http: &reqwest::Client, vc: &Value) -> Result<StatusInfo> {
    let entry = CredentialStatus::from_credential(vc)?;
    let list = fetch_list(http, entry.list_credential()).await?;
    let status = list.status(entry.index())?;

    tracing::debug!(
        list = entry.list_credential(),
        index = entry.index(),
        status,
        "read credential status"
    );

    Ok(StatusInfo {
        status,
        status_list_credential: entry.list_credential().to_string(),
        status_list_index: entry.index(),
    })
}

/// Retrieve and decode the status list credential at `url`.
///
/// # Errors
///
/// Returns an error if the request fails, the response is not a JSON
/// credential, or its `credentialSubject.encodedList` cannot be decoded.
pub async fn fetch_list(http: &reqwest::Client, url: &str) -> Result<StatusList> {
    let http_resp = http.get(url).send().await?;
    if !http_resp.status().is_success() {
        let status = http_resp.status();
        let body = http_resp.text().await.unwrap_or_default();
        return Err(crate::Error::Fetch(format!("{url}: {status}, {body}")));
    }
    let slc = http_resp.json::<Value>().await?;
    decode_credential(&slc)
}

/// Decode the list carried by a status list credential.
///
/// # Errors
///
/// Returns an error if `credentialSubject.encodedList` is missing or cannot
/// be decoded.
pub fn decode_credential(slc: &Value) -> Result<StatusList> {
    let Some(subject) = slc.get("credentialSubject") else {
        return Err(invalid!("status list credential has no `credentialSubject`"));
    };
    let Some(encoded) = subject.get("encodedList").and_then(Value::as_str) else {
        return Err(invalid!("status list credential has no `encodedList`"));
    };
    StatusList::from_encoded(encoded)
}
