//! # VC API Client
//!
//! Clients for the issuer and verifier endpoints of VC API implementations
//! under test, and the registry of implementations they belong to.
//!
//! Implementations are described by JSON manifests (see [`Manifest`]) and
//! loaded into a [`Registry`]. Each issuer or verifier endpoint is wrapped in
//! an [`Endpoint`] that attaches authorization and maps responses to a
//! [`Reply`] (2xx) or an [`Error::Status`] (anything else).

mod auth;
mod endpoint;
mod error;
mod manifest;
mod registry;

pub use self::endpoint::*;
pub use self::error::*;
pub use self::manifest::*;
pub use self::registry::*;

/// Result type for VC API calls.
pub type Result<T> = anyhow::Result<T, Error>;
