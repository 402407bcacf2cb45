//! # Expectations
//!
//! Assertions over VC API responses. Each returns the first unmet
//! expectation as an error, which becomes the failed cell's message.

use anyhow::{Result, anyhow, bail, ensure};
use credibil_interop_vcapi::{self as vcapi, Reply};
use http::StatusCode;
use serde_json::{Map, Value};

/// The call must succeed (a result and no error).
///
/// # Errors
///
/// Returns an error describing the failed call.
pub fn success(result: vcapi::Result<Reply>, call: &str) -> Result<Reply> {
    result.map_err(|e| anyhow!("{call} should succeed: {e}"))
}

/// The call must fail with an HTTP error response that carries data.
/// Returns the error's status and data.
///
/// # Errors
///
/// Returns an error if the call succeeded, failed without an HTTP response,
/// or the response had no body.
pub fn rejected(result: vcapi::Result<Reply>, call: &str) -> Result<(StatusCode, Value)> {
    match result {
        Ok(reply) => bail!("{call} should fail but returned {}", reply.status),
        Err(vcapi::Error::Status { status, data: Some(data) }) => Ok((status, data)),
        Err(vcapi::Error::Status { status, data: None }) => {
            bail!("{call} error response ({status}) should have data")
        }
        Err(e) => bail!("{call} should return an error response: {e}"),
    }
}

/// The reply must have the expected status.
///
/// # Errors
///
/// Returns an error if the status differs.
pub fn status(reply: &Reply, expected: StatusCode) -> Result<()> {
    ensure!(reply.status == expected, "expected status {expected}, got {}", reply.status);
    Ok(())
}

/// The reply must carry a JSON object.
///
/// # Errors
///
/// Returns an error if the reply has no data or the data is not an object.
pub fn object(reply: &Reply) -> Result<&Map<String, Value>> {
    let Some(data) = &reply.data else {
        bail!("response should have data");
    };
    data.as_object().ok_or_else(|| anyhow!("response data should be an object, got {data}"))
}

/// `data.verified` must equal `expected`.
///
/// # Errors
///
/// Returns an error if `verified` is missing or differs.
pub fn verified(data: &Map<String, Value>, expected: bool) -> Result<()> {
    let actual = data.get("verified").and_then(Value::as_bool);
    ensure!(actual == Some(expected), "expected `verified` to be {expected}, got {}", show(actual));
    Ok(())
}

/// `data.statusResult.verified` must equal `expected`.
///
/// # Errors
///
/// Returns an error if `statusResult.verified` is missing or differs.
pub fn status_verified(data: &Map<String, Value>, expected: bool) -> Result<()> {
    let actual = data.get("statusResult").and_then(|r| r.get("verified")).and_then(Value::as_bool);
    ensure!(
        actual == Some(expected),
        "expected `statusResult.verified` to be {expected}, got {}",
        show(actual)
    );
    Ok(())
}

/// `data.checks` must equal `expected`, in order.
///
/// # Errors
///
/// Returns an error if `checks` is missing or differs.
pub fn checks(data: &Map<String, Value>, expected: &[&str]) -> Result<()> {
    let actual = data
        .get("checks")
        .and_then(Value::as_array)
        .map(|checks| checks.iter().map(|c| c.as_str().unwrap_or_default()).collect::<Vec<_>>());
    ensure!(
        actual.as_deref() == Some(expected),
        "expected `checks` to be {expected:?}, got {}",
        actual.map_or_else(|| "nothing".to_string(), |a| format!("{a:?}"))
    );
    Ok(())
}

fn show(value: Option<bool>) -> String {
    value.map_or_else(|| "nothing".to_string(), |v| v.to_string())
}
