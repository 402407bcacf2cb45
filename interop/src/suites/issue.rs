//! # StatusList2021 Credentials (Issue)
//!
//! Checks the status entry on credentials each issuer returns.

use anyhow::{Result, anyhow, ensure};
use credibil_interop_report::Matrix;
use credibil_interop_status::{CredentialStatus, fetch_status};
use serde_json::Value;

use crate::case;
use crate::suite::{self, Context};

/// Suite title.
pub const TITLE: &str = "StatusList2021 Credentials (Issue)";

/// Row: the credential carries `credentialStatus`.
pub const HAS_STATUS: &str = "MUST issue a VC with a `credentialStatus`";

/// Row: the status entry is of a supported type.
pub const SUPPORTED_TYPE: &str = "`credentialStatus` MUST have a supported status entry type";

/// Row: the status list credential can be fetched and decoded.
pub const DEREFERENCES: &str =
    "`statusListCredential` MUST dereference to a status list credential";

/// Run the suite.
pub async fn run(ctx: &Context) -> Matrix {
    let mut matrix = Matrix::new(TITLE).column_label("Issuer");

    for implementation in &ctx.implementations() {
        let Some(issuer) = implementation.issuer(&ctx.tag) else {
            continue;
        };
        let column = implementation.name.as_str();

        tracing::info!(issuer = column, "issuing credential");
        let issued = suite::issue(issuer).await;
        let vc = || issued.as_ref().map_err(|e| anyhow!("issuer should issue a credential: {e:#}"));

        case::run(&mut matrix, HAS_STATUS, column, async { has_status(vc()) }).await;
        case::run(&mut matrix, SUPPORTED_TYPE, column, async { supported_type(vc()) }).await;
        case::run(&mut matrix, DEREFERENCES, column, dereferences(ctx, vc())).await;
    }

    matrix
}

fn has_status(vc: Result<&Value>) -> Result<()> {
    let status = vc?.get("credentialStatus");
    ensure!(
        status.is_some_and(|s| s.is_object() || s.is_array()),
        "credential should have a `credentialStatus` object or array"
    );
    Ok(())
}

fn supported_type(vc: Result<&Value>) -> Result<()> {
    let entry = CredentialStatus::from_credential(vc?)?;
    tracing::debug!(type_ = entry.type_name(), index = entry.index(), "status entry");
    ensure!(!entry.list_credential().is_empty(), "status list credential URL should not be empty");
    Ok(())
}

async fn dereferences(ctx: &Context, vc: Result<&Value>) -> Result<()> {
    let info = fetch_status(&ctx.http, vc?).await?;
    ensure!(!info.status, "a newly issued credential should not be revoked");
    Ok(())
}
