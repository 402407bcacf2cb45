//! # Mock Implementations
//!
//! In-process VC API issuers and verifiers for exercising the interop suites
//! without reaching external services.

pub mod issuer;
pub mod status_list;
pub mod verifier;

use anyhow::Result;
use credibil_interop_vcapi::{EndpointSettings, Manifest};

pub use self::issuer::{IssuerMode, MockIssuer};
pub use self::verifier::{MockVerifier, VerifierMode};

/// Tag advertised by mock endpoints.
pub const TAG: &str = "StatusList2021";

/// A mock implementation: one issuer and one verifier.
#[derive(Debug)]
pub struct MockImplementation {
    /// Implementation name.
    pub name: String,

    /// The running issuer.
    pub issuer: MockIssuer,

    /// The running verifier.
    pub verifier: MockVerifier,
}

impl MockImplementation {
    /// Start a conformant implementation.
    ///
    /// # Errors
    ///
    /// Returns an error if either service cannot be started.
    pub async fn start(name: &str) -> Result<Self> {
        Self::with_modes(name, IssuerMode::Conformant, VerifierMode::Conformant).await
    }

    /// Start an implementation with the given issuer and verifier behaviour.
    ///
    /// # Errors
    ///
    /// Returns an error if either service cannot be started.
    pub async fn with_modes(
        name: &str, issuer_mode: IssuerMode, verifier_mode: VerifierMode,
    ) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            issuer: issuer::serve(issuer_mode).await?,
            verifier: verifier::serve(verifier_mode).await?,
        })
    }

    /// A manifest describing the implementation.
    #[must_use]
    pub fn manifest(&self) -> Manifest {
        Manifest {
            name: self.name.clone(),
            implementation: Some(format!("{} (mock)", self.name)),
            issuers: vec![EndpointSettings::new(self.issuer.endpoint()).id(&self.issuer.did).tag(TAG)],
            verifiers: vec![EndpointSettings::new(self.verifier.endpoint()).tag(TAG)],
        }
    }
}
