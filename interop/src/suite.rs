//! # Suite Context
//!
//! State and helpers shared by the suites.

use anyhow::{Context as _, Result, anyhow};
use chrono::Utc;
use credibil_interop_vcapi::{Endpoint, Registry};
use serde_json::{Value, json};

use crate::{credentials, expect};

/// Checks requested from verifiers.
pub const CHECKS: [&str; 2] = ["proof", "credentialStatus"];

/// Default tag selecting status list implementations.
pub const DEFAULT_TAG: &str = "StatusList2021";

/// Default `credentialStatus.type` sent when revoking.
pub const DEFAULT_STATUS_TYPE: &str = "RevocationList2020Status";

/// Everything a suite needs to run.
#[derive(Clone, Debug)]
pub struct Context {
    /// Implementations available for testing.
    pub registry: Registry,

    /// Tag selecting issuer and verifier endpoints.
    pub tag: String,

    /// `credentialStatus.type` sent with set-status requests.
    pub status_type: String,

    /// Client for fetching status list credentials.
    pub http: reqwest::Client,
}

impl Context {
    /// Create a context for `registry` using the default tag and status
    /// type.
    #[must_use]
    pub fn new(registry: Registry, http: reqwest::Client) -> Self {
        Self {
            registry,
            tag: DEFAULT_TAG.to_string(),
            status_type: DEFAULT_STATUS_TYPE.to_string(),
            http,
        }
    }

    /// Select endpoints carrying `tag`.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the `credentialStatus.type` sent with set-status requests.
    #[must_use]
    pub fn status_type(mut self, status_type: impl Into<String>) -> Self {
        self.status_type = status_type.into();
        self
    }

    /// The implementations under test: those with an issuer carrying the
    /// context's tag.
    #[must_use]
    pub fn implementations(&self) -> Registry {
        self.registry.clone().tagged(&self.tag)
    }
}

/// Issue a fresh credential, returning the `verifiableCredential` from the
/// issuer's response.
///
/// # Errors
///
/// Returns an error if the issuer fails or its response has no credential.
pub async fn issue(issuer: &Endpoint) -> Result<Value> {
    let body = credentials::issue_request(issuer.id(), Utc::now())?;
    let reply = expect::success(issuer.issue(&body).await, "issuing")?;
    reply
        .data
        .and_then(|mut data| data.get_mut("verifiableCredential").map(Value::take))
        .filter(Value::is_object)
        .ok_or_else(|| anyhow!("issuer response should have a `verifiableCredential`"))
}

/// The body of a verify request checking proof and status.
#[must_use]
pub fn verify_request(vc: &Value) -> Value {
    json!({
        "verifiableCredential": vc,
        "options": { "checks": CHECKS }
    })
}

/// The credential's `id`.
///
/// # Errors
///
/// Returns an error if the credential has no string `id`.
pub fn credential_id(vc: &Value) -> Result<&str> {
    vc.get("id").and_then(Value::as_str).context("credential should have an `id`")
}
