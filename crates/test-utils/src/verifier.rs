//! # Mock Verifier
//!
//! A (naive) VC API verifier. It checks a credential's proof is present and,
//! when asked to, dereferences the credential's status list.

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use credibil_interop_status::fetch_status;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

/// How the mock verifier behaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerifierMode {
    /// Checks credential status when `credentialStatus` is requested.
    #[default]
    Conformant,

    /// Reports every credential with a proof as valid, revoked or not.
    IgnoreStatus,
}

/// A running mock verifier.
#[derive(Debug)]
pub struct MockVerifier {
    /// Base URL, e.g. `http://127.0.0.1:49153`.
    pub base: String,

    handle: JoinHandle<()>,
}

impl MockVerifier {
    /// The `/credentials/verify` URL.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/credentials/verify", self.base)
    }
}

impl Drop for MockVerifier {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Clone)]
struct Verifier {
    mode: VerifierMode,
    http: reqwest::Client,
}

/// Start a mock verifier on an ephemeral local port.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn serve(mode: VerifierMode) -> Result<MockVerifier> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let verifier = Verifier { mode, http: reqwest::Client::new() };
    let router = Router::new()
        .route("/credentials/verify", post(verify))
        .layer(TraceLayer::new_for_http())
        .with_state(verifier);

    let handle = tokio::spawn(async move {
        tracing::info!("mock verifier listening on {addr}");
        axum::serve(listener, router).await.expect("server should run");
    });

    Ok(MockVerifier { base: format!("http://{addr}"), handle })
}

#[axum::debug_handler]
async fn verify(State(verifier): State<Verifier>, Json(body): Json<Value>) -> Response {
    let checks = body
        .pointer("/options/checks")
        .and_then(Value::as_array)
        .map_or_else(|| vec![json!("proof")], Clone::clone);

    let Some(vc) = body.get("verifiableCredential").filter(|vc| vc.is_object()) else {
        return rejected(&checks, "request has no `verifiableCredential`", None);
    };

    let has_proof = vc
        .pointer("/proof/proofValue")
        .and_then(Value::as_str)
        .is_some_and(|value| value.starts_with('z'));
    if !has_proof {
        return rejected(&checks, "credential has no valid proof", None);
    }

    let check_status = checks.iter().any(|c| c == "credentialStatus");
    if check_status && verifier.mode == VerifierMode::Conformant {
        match fetch_status(&verifier.http, vc).await {
            Ok(info) if info.status => {
                return rejected(&checks, "credential has been revoked", Some(false));
            }
            Ok(_) => {}
            Err(e) => return rejected(&checks, &e.to_string(), Some(false)),
        }
    }

    let mut result = json!({
        "verified": true,
        "checks": checks,
        "warnings": [],
        "errors": []
    });
    if check_status {
        result["statusResult"] = json!({"verified": true});
    }
    (StatusCode::OK, Json(result)).into_response()
}

fn rejected(checks: &[Value], error: &str, status_verified: Option<bool>) -> Response {
    let mut result = json!({
        "verified": false,
        "checks": checks,
        "warnings": [],
        "errors": [{"message": error}]
    });
    if let Some(verified) = status_verified {
        result["statusResult"] = json!({"verified": verified});
    }
    (StatusCode::BAD_REQUEST, Json(result)).into_response()
}
