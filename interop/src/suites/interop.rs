//! # StatusList2021 Credentials (Interop)
//!
//! Each implementation's issuer issues a credential that every
//! implementation's verifier must accept, then revokes a credential that
//! every verifier must reject.

use anyhow::{Result, anyhow, ensure};
use credibil_interop_report::{Matrix, Outcome};
use credibil_interop_status::fetch_status;
use credibil_interop_vcapi::Endpoint;
use http::StatusCode;
use serde_json::{Value, json};

use crate::suite::{self, CHECKS, Context};
use crate::{case, expect};

/// Suite title.
pub const TITLE: &str = "StatusList2021 Credentials (Interop)";

/// Row title of the verification test for credentials from `issuer`.
#[must_use]
pub fn verify_title(issuer: &str) -> String {
    format!("MUST successfully verify VC issued by {issuer}")
}

/// Row title of the revocation test for credentials from `issuer`.
#[must_use]
pub fn revoke_title(issuer: &str) -> String {
    format!("MUST revoke a credential issued by {issuer} and fail to verify it")
}

/// Run the suite.
pub async fn run(ctx: &Context) -> Matrix {
    let implementations = ctx.implementations();
    let mut matrix = Matrix::new(TITLE);
    for implementation in &implementations {
        matrix.add_column(&implementation.name);
    }

    for issuer_impl in &implementations {
        let Some(issuer) = issuer_impl.issuer(&ctx.tag) else {
            continue;
        };
        let verify_row = verify_title(&issuer_impl.name);
        let revoke_row = revoke_title(&issuer_impl.name);

        tracing::info!(issuer = issuer_impl.name.as_str(), "issuing credential");
        let issued = suite::issue(issuer).await;

        for verifier_impl in &implementations {
            let column = verifier_impl.name.as_str();
            let Some(verifier) = verifier_impl.verifier(&ctx.tag) else {
                let reason = format!("no verifier tagged {}", ctx.tag);
                matrix.record(&verify_row, column, Outcome::pending(&reason));
                matrix.record(&revoke_row, column, Outcome::pending(reason));
                continue;
            };

            let vc = issued.as_ref().map_err(|e| anyhow!("issuer should issue a credential: {e:#}"));
            case::run(&mut matrix, &verify_row, column, verify(vc, verifier)).await;
            case::run(&mut matrix, &revoke_row, column, revoke(ctx, issuer, verifier)).await;
        }
    }

    matrix
}

/// The verifier accepts an unrevoked credential.
async fn verify(vc: Result<&Value>, verifier: &Endpoint) -> Result<()> {
    let vc = vc?;
    let reply = expect::success(verifier.verify(&suite::verify_request(vc)).await, "verifying")?;
    expect::status(&reply, StatusCode::OK)?;

    let data = expect::object(&reply)?;
    expect::verified(data, true)?;
    expect::status_verified(data, true)?;
    expect::checks(data, &CHECKS)
}

/// The issuer revokes a credential and the verifier rejects it.
///
/// Each cell issues its own credential so that revocation in one cell does
/// not affect the others.
async fn revoke(ctx: &Context, issuer: &Endpoint, verifier: &Endpoint) -> Result<()> {
    let vc = suite::issue(issuer).await?;

    // status starts unset
    let status_info = fetch_status(&ctx.http, &vc).await?;
    ensure!(!status_info.status, "credential status should not be set before revocation");

    // verification passes
    let body = suite::verify_request(&vc);
    let reply = expect::success(verifier.verify(&body).await, "verifying")?;
    expect::status(&reply, StatusCode::OK)?;
    let data = expect::object(&reply)?;
    expect::verified(data, true)?;
    expect::status_verified(data, true)?;

    // revoke
    let set_status = json!({
        "credentialId": suite::credential_id(&vc)?,
        "credentialStatus": { "type": ctx.status_type }
    });
    let reply = expect::success(issuer.set_status(&set_status).await, "setting status")?;
    expect::status(&reply, StatusCode::OK)?;

    // force publication of the updated status list credential
    let publish_url = format!("{}/publish", status_info.status_list_credential);
    let reply = expect::success(
        issuer.publish_slc(&publish_url, &json!({})).await,
        "publishing status list",
    )?;
    expect::status(&reply, StatusCode::NO_CONTENT)?;

    let status_info = fetch_status(&ctx.http, &vc).await?;
    ensure!(status_info.status, "credential status should be set after revocation");

    // verification now fails
    let (status, data) = expect::rejected(verifier.verify(&body).await, "verifying revoked")?;
    ensure!(status == StatusCode::BAD_REQUEST, "expected status {}, got {status}", StatusCode::BAD_REQUEST);
    let data = data.as_object().ok_or_else(|| anyhow!("error data should be an object"))?;
    expect::verified(data, false)
}
