//! # VC API Endpoint
//!
//! A client for one issuer or verifier endpoint of an implementation under
//! test.

use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::manifest::EndpointSettings;
use crate::{Error, Result, auth};

/// A successful (2xx) response from an implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status returned by the implementation.
    pub status: StatusCode,

    /// Response body, or `None` when the body was empty. A body that is not
    /// JSON is kept as a JSON string.
    pub data: Option<Value>,
}

/// Time allowed for an access token request unless overridden with
/// [`Endpoint::token_timeout`].
pub const TOKEN_TIMEOUT: Duration = Duration::from_secs(30);

/// A client for an implementation's issuer or verifier endpoint.
#[derive(Clone, Debug)]
pub struct Endpoint {
    settings: EndpointSettings,
    http: reqwest::Client,
    pub(crate) token_timeout: Duration,
    token: Arc<OnceCell<Option<String>>>,
}

impl Endpoint {
    /// Create a client for the endpoint described by `settings`.
    #[must_use]
    pub fn new(settings: EndpointSettings, http: reqwest::Client) -> Self {
        Self { settings, http, token_timeout: TOKEN_TIMEOUT, token: Arc::new(OnceCell::new()) }
    }

    /// Limit how long an access token request may take.
    #[must_use]
    pub fn token_timeout(mut self, timeout: Duration) -> Self {
        self.token_timeout = timeout;
        self
    }

    /// The endpoint's settings.
    #[must_use]
    pub const fn settings(&self) -> &EndpointSettings {
        &self.settings
    }

    /// The issuer or verifier identifier, or an empty string when the
    /// manifest omits it.
    #[must_use]
    pub fn id(&self) -> &str {
        self.settings.id.as_deref().unwrap_or_default()
    }

    /// Whether the endpoint carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.settings.has_tag(tag)
    }

    /// Issue a credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the implementation responds
    /// with a non-success status.
    pub async fn issue(&self, body: &impl Serialize) -> Result<Reply> {
        self.post(&self.settings.endpoint, body).await
    }

    /// Verify a credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the implementation responds
    /// with a non-success status.
    pub async fn verify(&self, body: &impl Serialize) -> Result<Reply> {
        self.post(&self.settings.endpoint, body).await
    }

    /// Update the status (e.g. revoke) of a previously issued credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the implementation responds
    /// with a non-success status.
    pub async fn set_status(&self, body: &impl Serialize) -> Result<Reply> {
        self.post(&self.settings.status_url(), body).await
    }

    /// Force publication of a status list credential.
    ///
    /// `endpoint` is the publish URL, usually the status list credential URL
    /// with `/publish` appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the implementation responds
    /// with a non-success status.
    pub async fn publish_slc(&self, endpoint: &str, body: &impl Serialize) -> Result<Reply> {
        self.post(endpoint, body).await
    }

    async fn post(&self, url: &str, body: &impl Serialize) -> Result<Reply> {
        let token = self
            .token
            .get_or_try_init(|| auth::access_token(&self.settings, self.token_timeout))
            .await?;

        let mut request = self.http.post(url).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(url, "POST");
        let http_resp = request.send().await?;
        let status = http_resp.status();
        let bytes = http_resp.bytes().await?;
        tracing::debug!(url, %status, "response");

        let data = if bytes.is_empty() {
            None
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(data) => Some(data),
                Err(e) => {
                    tracing::warn!(url, %status, error = %e, "response body is not JSON");
                    Some(Value::String(String::from_utf8_lossy(&bytes).into_owned()))
                }
            }
        };

        if !status.is_success() {
            return Err(Error::Status { status, data });
        }
        Ok(Reply { status, data })
    }
}
