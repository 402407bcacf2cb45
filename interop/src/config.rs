//! # Configuration
//!
//! Command line arguments for the `statuslist-interop` binary.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use credibil_interop_vcapi::Registry;

use crate::suite::{Context, DEFAULT_STATUS_TYPE, DEFAULT_TAG};

/// Suites that can be run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SuiteSelection {
    /// Every suite.
    #[default]
    All,

    /// Cross-implementation issue, verify, and revoke.
    Interop,

    /// Issuer status entry checks.
    Issue,
}

/// Status list interoperability test suite.
#[derive(Clone, Debug, Parser)]
#[command(name = "statuslist-interop", version)]
#[command(about = "Status list revocation interoperability tests for VC API implementations")]
pub struct Args {
    /// Implementation manifest file, or directory of manifest files.
    #[arg(short, long, env = "INTEROP_IMPLEMENTATIONS", default_value = "implementations")]
    pub implementations: PathBuf,

    /// Only test endpoints carrying this tag.
    #[arg(short, long, default_value = DEFAULT_TAG)]
    pub tag: String,

    /// Only test the named implementations (repeatable).
    #[arg(long)]
    pub only: Vec<String>,

    /// Suites to run.
    #[arg(long, value_enum, default_value_t = SuiteSelection::All)]
    pub suite: SuiteSelection,

    /// `credentialStatus.type` sent with set-status requests.
    #[arg(long, default_value = DEFAULT_STATUS_TYPE)]
    pub status_type: String,

    /// Directory to write the report to.
    #[arg(short, long, default_value = "reports")]
    pub report_dir: PathBuf,

    /// Request timeout in seconds, including access token requests.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Build the HTTP client, load the implementation registry, and create
    /// the suite context.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built or the manifests cannot
    /// be loaded.
    pub fn context(&self) -> Result<Context> {
        let timeout = Duration::from_secs(self.timeout);
        let http =
            reqwest::Client::builder().timeout(timeout).build().context("building HTTP client")?;

        let registry = Registry::load(&self.implementations, &http)
            .with_context(|| format!("loading implementations from {}", self.implementations.display()))?
            .only(&self.only)
            .token_timeout(timeout);

        let ctx = Context::new(registry, http).tag(&self.tag).status_type(&self.status_type);
        tracing::info!(
            implementations = ?ctx.implementations().names(),
            tag = ctx.tag.as_str(),
            "selected implementations"
        );
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["statuslist-interop"]).expect("should parse");
        assert_eq!(args.tag, "StatusList2021");
        assert_eq!(args.status_type, "RevocationList2020Status");
        assert_eq!(args.suite, SuiteSelection::All);
        assert_eq!(args.timeout, 30);
        assert!(args.only.is_empty());
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "statuslist-interop",
            "--implementations",
            "manifests/acme.json",
            "--only",
            "Acme",
            "--only",
            "Beta",
            "--suite",
            "interop",
            "--status-type",
            "StatusList2021Entry",
        ])
        .expect("should parse");
        assert_eq!(args.implementations, PathBuf::from("manifests/acme.json"));
        assert_eq!(args.only, vec!["Acme", "Beta"]);
        assert_eq!(args.suite, SuiteSelection::Interop);
        assert_eq!(args.status_type, "StatusList2021Entry");
    }
}
