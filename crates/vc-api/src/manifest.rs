//! # Implementation Manifests
//!
//! A manifest describes one implementation under test: the issuer and
//! verifier endpoints it exposes, the tags advertising what each endpoint
//! supports, and how to authorize calls to it.
//!
//! ```json
//! {
//!   "name": "Acme",
//!   "implementation": "Acme VC API",
//!   "issuers": [{
//!     "id": "did:key:z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK",
//!     "endpoint": "https://vc.acme.example/credentials/issue",
//!     "tags": ["StatusList2021"],
//!     "oauth2": {
//!       "clientId": "interop",
//!       "clientSecretEnv": "ACME_CLIENT_SECRET",
//!       "tokenEndpoint": "https://auth.acme.example/oauth/token",
//!       "scopes": ["issue"]
//!     }
//!   }],
//!   "verifiers": [{
//!     "endpoint": "https://vc.acme.example/credentials/verify",
//!     "tags": ["StatusList2021"],
//!     "bearerTokenEnv": "ACME_TOKEN"
//!   }]
//! }
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// An implementation manifest.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Unique name of the implementation. Used as the matrix column label.
    pub name: String,

    /// Longer, human-readable name of the implementation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,

    /// Issuer endpoints.
    #[serde(default)]
    pub issuers: Vec<EndpointSettings>,

    /// Verifier endpoints.
    #[serde(default)]
    pub verifiers: Vec<EndpointSettings>,
}

/// Settings for a single issuer or verifier endpoint.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSettings {
    /// Issuer identifier (usually a DID) or verifier identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Absolute URL of the endpoint, e.g. `https://.../credentials/issue`.
    pub endpoint: String,

    /// Features the endpoint supports.
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Set-status URL, when it cannot be derived from the issue endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_endpoint: Option<String>,

    /// Name of an environment variable holding a static bearer token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_token_env: Option<String>,

    /// `OAuth2` client credentials used to obtain an access token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth2: Option<OAuth2Settings>,
}

/// `OAuth2` client credentials grant settings.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2Settings {
    /// Client identifier registered with the authorization server.
    pub client_id: String,

    /// Name of an environment variable holding the client secret.
    pub client_secret_env: String,

    /// Token endpoint of the authorization server.
    pub token_endpoint: String,

    /// Audience requested for the token, if the server requires one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_audience: Option<String>,

    /// Scopes requested for the token.
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl EndpointSettings {
    /// Create settings for an endpoint URL with no tags or authorization.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), ..Self::default() }
    }

    /// Set the issuer or verifier identifier.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Whether the endpoint carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// The URL used to set a credential's status.
    ///
    /// Defaults to the issue endpoint with its trailing `credentials/issue`
    /// replaced by `credentials/status`.
    #[must_use]
    pub fn status_url(&self) -> String {
        if let Some(url) = &self.status_endpoint {
            return url.clone();
        }
        let endpoint = self.endpoint.trim_end_matches('/');
        endpoint.strip_suffix("credentials/issue").map_or_else(
            || format!("{endpoint}/status"),
            |base| format!("{base}credentials/status"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize() {
        let manifest: Manifest = serde_json::from_str(
            r#"{
                "name": "Acme",
                "issuers": [{
                    "id": "did:key:z6Mk",
                    "endpoint": "https://vc.acme.example/credentials/issue",
                    "tags": ["StatusList2021", "vc-api"],
                    "oauth2": {
                        "clientId": "interop",
                        "clientSecretEnv": "ACME_SECRET",
                        "tokenEndpoint": "https://auth.acme.example/token",
                        "tokenAudience": "https://vc.acme.example"
                    }
                }]
            }"#,
        )
        .expect("should deserialize");

        assert_eq!(manifest.name, "Acme");
        assert!(manifest.verifiers.is_empty());

        let issuer = &manifest.issuers[0];
        assert!(issuer.has_tag("StatusList2021"));
        assert!(!issuer.has_tag("Ed25519Signature2020"));

        let oauth2 = issuer.oauth2.as_ref().expect("should have oauth2 settings");
        assert_eq!(oauth2.client_secret_env, "ACME_SECRET");
        assert!(oauth2.scopes.is_empty());
    }

    #[test]
    fn derived_status_url() {
        let settings = EndpointSettings::new("https://vc.acme.example/instances/z19/credentials/issue");
        assert_eq!(settings.status_url(), "https://vc.acme.example/instances/z19/credentials/status");
    }

    #[test]
    fn explicit_status_url() {
        let mut settings = EndpointSettings::new("https://vc.acme.example/issue");
        assert_eq!(settings.status_url(), "https://vc.acme.example/issue/status");

        settings.status_endpoint = Some("https://vc.acme.example/revocations".into());
        assert_eq!(settings.status_url(), "https://vc.acme.example/revocations");
    }
}
