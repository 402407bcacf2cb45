//! # Endpoint Authorization
//!
//! Obtain the bearer token, if any, to attach to calls to an endpoint.

use std::time::Duration;

use oauth2::basic::BasicClient;
use oauth2::{ClientId, ClientSecret, Scope, TokenResponse, TokenUrl};

use crate::manifest::{EndpointSettings, OAuth2Settings};
use crate::{Error, Result};

/// Resolve the access token for an endpoint. Returns `None` for endpoints
/// that do not require authorization.
pub(crate) async fn access_token(
    settings: &EndpointSettings, timeout: Duration,
) -> Result<Option<String>> {
    if let Some(oauth2) = &settings.oauth2 {
        return client_credentials(oauth2, timeout).await.map(Some);
    }
    if let Some(var) = &settings.bearer_token_env {
        return secret(var).map(Some);
    }
    Ok(None)
}

async fn client_credentials(settings: &OAuth2Settings, timeout: Duration) -> Result<String> {
    let token_url = TokenUrl::new(settings.token_endpoint.clone())
        .map_err(|e| Error::Authorization(format!("invalid token endpoint: {e}")))?;
    let client = BasicClient::new(ClientId::new(settings.client_id.clone()))
        .set_client_secret(ClientSecret::new(secret(&settings.client_secret_env)?))
        .set_token_uri(token_url);

    let mut request = client.exchange_client_credentials();
    for scope in &settings.scopes {
        request = request.add_scope(Scope::new(scope.clone()));
    }
    if let Some(audience) = &settings.token_audience {
        request = request.add_extra_param("audience", audience.clone());
    }

    // token requests must not follow redirects
    let http = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(timeout)
        .build()?;
    let response = request
        .request_async(&http)
        .await
        .map_err(|e| Error::Authorization(format!("issue requesting access token: {e}")))?;

    tracing::debug!(client_id = settings.client_id.as_str(), "obtained access token");
    Ok(response.access_token().secret().clone())
}

fn secret(var: &str) -> Result<String> {
    std::env::var(var).map_err(|_| Error::Authorization(format!("environment variable {var} is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_authorization() {
        let settings = EndpointSettings::new("http://localhost:8080/credentials/issue");
        let token = access_token(&settings, Duration::from_secs(1)).await.expect("should resolve");
        assert!(token.is_none());
    }

    #[tokio::test]
    async fn missing_secret() {
        let mut settings = EndpointSettings::new("http://localhost:8080/credentials/issue");
        settings.bearer_token_env = Some("INTEROP_TEST_TOKEN_THAT_IS_NOT_SET".into());

        let err = access_token(&settings, Duration::from_secs(1)).await.expect_err("should fail");
        assert!(matches!(err, Error::Authorization(_)));
    }
}
