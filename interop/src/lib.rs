//! # Status List Interop
//!
//! Interoperability suites for VC API implementations of status list
//! revocation.
//!
//! Credentials are issued through one implementation's issuer, verified by
//! every implementation's verifier, then revoked and verified again. Results
//! are recorded in interop matrices (one row per test, one column per
//! implementation) and written out as a report.

pub mod case;
pub mod config;
pub mod credentials;
pub mod expect;
pub mod suite;
pub mod suites;

use credibil_interop_report::Report;

pub use self::config::{Args, SuiteSelection};
pub use self::suite::Context;

/// Report title.
pub const REPORT_TITLE: &str = "Status List Interoperability Report";

/// Run the selected suites.
pub async fn run(ctx: &Context, selection: SuiteSelection) -> Report {
    let mut report = Report::new(REPORT_TITLE);

    if matches!(selection, SuiteSelection::All | SuiteSelection::Issue) {
        tracing::info!(suite = suites::issue::TITLE, "running suite");
        report.suites.push(suites::issue::run(ctx).await);
    }
    if matches!(selection, SuiteSelection::All | SuiteSelection::Interop) {
        tracing::info!(suite = suites::interop::TITLE, "running suite");
        report.suites.push(suites::interop::run(ctx).await);
    }

    report
}
