//! # Mock Issuer
//!
//! A (naive) VC API issuer that adds a `StatusList2021Entry` to each
//! credential it issues and serves a single status list.
//!
//! Status changes are staged until the list is published, the way hosted
//! implementations cache their status list credentials.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::status_list::{Bitstring, LIST_SIZE};

/// The only status list the mock issuer serves.
const LIST_ID: &str = "1";

/// How the mock issuer behaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IssuerMode {
    /// Issues credentials with a status entry.
    #[default]
    Conformant,

    /// Issues credentials without `credentialStatus`.
    NoStatus,
}

/// A running mock issuer.
#[derive(Debug)]
pub struct MockIssuer {
    /// Base URL, e.g. `http://127.0.0.1:49152`.
    pub base: String,

    /// Issuer DID.
    pub did: String,

    handle: JoinHandle<()>,
}

impl MockIssuer {
    /// The `/credentials/issue` URL.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/credentials/issue", self.base)
    }

    /// The status list credential URL.
    #[must_use]
    pub fn status_list(&self) -> String {
        format!("{}/status/{LIST_ID}", self.base)
    }
}

impl Drop for MockIssuer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Clone)]
struct Issuer {
    base: String,
    did: String,
    mode: IssuerMode,
    state: Arc<RwLock<Lists>>,
}

#[derive(Default)]
struct Lists {
    indexes: HashMap<String, usize>,
    staged: Bitstring,
    published: Bitstring,
}

/// Start a mock issuer on an ephemeral local port.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn serve(mode: IssuerMode) -> Result<MockIssuer> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let base = format!("http://{addr}");
    let did = format!("did:web:{}", addr.to_string().replace(':', "%3A"));

    let issuer = Issuer {
        base: base.clone(),
        did: did.clone(),
        mode,
        state: Arc::new(RwLock::new(Lists::default())),
    };

    let router = Router::new()
        .route("/credentials/issue", post(issue))
        .route("/credentials/status", post(set_status))
        .route("/status/{id}", get(status_list))
        .route("/status/{id}/publish", post(publish))
        .layer(TraceLayer::new_for_http())
        .with_state(issuer);

    let handle = tokio::spawn(async move {
        tracing::info!("mock issuer listening on {addr}");
        axum::serve(listener, router).await.expect("server should run");
    });

    Ok(MockIssuer { base, did, handle })
}

#[axum::debug_handler]
async fn issue(State(issuer): State<Issuer>, Json(body): Json<Value>) -> Result<Response, AppError> {
    let Some(Value::Object(mut credential)) = body.get("credential").cloned() else {
        return Ok(bad_request("request has no `credential` object"));
    };

    let id = match credential.get("id").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => {
            let id = format!("urn:uuid:{}", uuid::Uuid::new_v4());
            credential.insert("id".into(), json!(id));
            id
        }
    };

    if issuer.mode == IssuerMode::Conformant {
        let mut lists = issuer.state.write().await;
        let index = lists.indexes.len();
        if index >= LIST_SIZE {
            return Err(anyhow!("status list is full").into());
        }
        lists.indexes.insert(id.clone(), index);

        let list_url = format!("{}/status/{LIST_ID}", issuer.base);
        credential.insert(
            "credentialStatus".into(),
            json!({
                "id": format!("{list_url}#{index}"),
                "type": "StatusList2021Entry",
                "statusPurpose": "revocation",
                "statusListIndex": index.to_string(),
                "statusListCredential": list_url,
            }),
        );
    }

    credential.insert("proof".into(), proof(&issuer.did));
    tracing::debug!(id = id.as_str(), "issued credential");

    Ok((StatusCode::CREATED, Json(json!({"verifiableCredential": credential})))
        .into_response())
}

#[axum::debug_handler]
async fn set_status(State(issuer): State<Issuer>, Json(body): Json<Value>) -> Response {
    let Some(id) = body.get("credentialId").and_then(Value::as_str) else {
        return bad_request("request has no `credentialId`");
    };

    let mut lists = issuer.state.write().await;
    let Some(index) = lists.indexes.get(id).copied() else {
        return (StatusCode::NOT_FOUND, Json(json!({"error": format!("unknown credential: {id}")})))
            .into_response();
    };
    lists.staged.set(index, true);
    tracing::debug!(id, index, "staged revocation");

    (StatusCode::OK, Json(json!({}))).into_response()
}

#[axum::debug_handler]
async fn status_list(
    State(issuer): State<Issuer>, Path(id): Path<String>,
) -> Result<Response, AppError> {
    if id != LIST_ID {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let encoded = issuer.state.read().await.published.encode()?;
    let list_url = format!("{}/status/{LIST_ID}", issuer.base);
    let slc = json!({
        "@context": [
            "https://www.w3.org/2018/credentials/v1",
            "https://w3id.org/vc/status-list/2021/v1"
        ],
        "id": list_url,
        "type": ["VerifiableCredential", "StatusList2021Credential"],
        "issuer": issuer.did,
        "issuanceDate": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "credentialSubject": {
            "id": format!("{list_url}#list"),
            "type": "StatusList2021",
            "statusPurpose": "revocation",
            "encodedList": encoded
        },
        "proof": proof(&issuer.did)
    });

    Ok(Json(slc).into_response())
}

#[axum::debug_handler]
async fn publish(State(issuer): State<Issuer>, Path(id): Path<String>) -> StatusCode {
    if id != LIST_ID {
        return StatusCode::NOT_FOUND;
    }
    let mut lists = issuer.state.write().await;
    lists.published = lists.staged.clone();
    StatusCode::NO_CONTENT
}

/// A stand-in proof. The mock verifier only checks its shape.
fn proof(did: &str) -> Value {
    json!({
        "type": "Ed25519Signature2020",
        "created": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "verificationMethod": format!("{did}#key-1"),
        "proofPurpose": "assertionMethod",
        "proofValue": "z58DAdFfa9SkqZMVPxAQpic7ndSayn1PzZs6ZjWp1CktyGesjuTSwRdoWhAfGFCF5bppETSTojQCrfFPP2oumHKtz"
    })
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response()
}

// Wrap anyhow::Error.
struct AppError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{}", self.0)).into_response()
    }
}
