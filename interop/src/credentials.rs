//! # Test Credentials
//!
//! The credential template sent to issuers, and helpers to complete it.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Months, SecondsFormat, Utc};
use serde_json::{Value, json};

const VALID_VC: &str = include_str!("../data/valid-vc.json");

/// Months from issuance until the test credential expires.
const VALIDITY_MONTHS: u32 = 2;

/// An unsigned credential with no `id`, `issuer`, or dates.
///
/// # Errors
///
/// Returns an error if the bundled template is not valid JSON.
pub fn valid_vc() -> Result<Value> {
    serde_json::from_str(VALID_VC).context("parsing credential template")
}

/// Format a timestamp as an ISO 8601 UTC date-time with second precision,
/// e.g. `2022-06-01T12:00:00Z`.
#[must_use]
pub fn iso_timestamp(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Build a VC API issue request for `issuer_id`: the template with a fresh
/// `urn:uuid` id, issued now and expiring in two months.
///
/// # Errors
///
/// Returns an error if the template cannot be parsed or the expiry date is
/// out of range.
pub fn issue_request(issuer_id: &str, now: DateTime<Utc>) -> Result<Value> {
    let expires = now
        .checked_add_months(Months::new(VALIDITY_MONTHS))
        .ok_or_else(|| anyhow!("expiration date out of range"))?;

    let mut credential = valid_vc()?;
    let Some(fields) = credential.as_object_mut() else {
        return Err(anyhow!("credential template is not an object"));
    };
    fields.insert("id".into(), json!(format!("urn:uuid:{}", uuid::Uuid::new_v4())));
    fields.insert("issuanceDate".into(), json!(iso_timestamp(now)));
    fields.insert("expirationDate".into(), json!(iso_timestamp(expires)));
    fields.insert("issuer".into(), json!(issuer_id));

    Ok(json!({ "credential": credential }))
}
