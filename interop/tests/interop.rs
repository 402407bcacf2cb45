//! Interop suite tests against mock implementations.

use credibil_interop::suites::interop::{self, revoke_title, verify_title};
use credibil_interop::{Context, SuiteSelection};
use credibil_interop_report::{Matrix, State};
use credibil_interop_vcapi::{EndpointSettings, Manifest, Registry};
use test_utils::{IssuerMode, MockImplementation, VerifierMode};

fn context(manifests: impl IntoIterator<Item = Manifest>) -> Context {
    let http = reqwest::Client::new();
    let registry = Registry::from_manifests(manifests, &http).expect("should build registry");
    Context::new(registry, http)
}

fn state(matrix: &Matrix, row: &str, column: &str) -> State {
    matrix.cell(row, column).unwrap_or_else(|| panic!("no cell for {row} / {column}")).outcome.state
}

fn error<'a>(matrix: &'a Matrix, row: &str, column: &str) -> &'a str {
    matrix
        .cell(row, column)
        .and_then(|c| c.outcome.error.as_deref())
        .unwrap_or_else(|| panic!("no error for {row} / {column}"))
}

// Credentials issued by every implementation verify everywhere and, once
// revoked, are rejected everywhere.
#[tokio::test]
async fn conformant_implementations() {
    let alpha = MockImplementation::start("Alpha").await.expect("should start Alpha");
    let bravo = MockImplementation::start("Bravo").await.expect("should start Bravo");
    let ctx = context([alpha.manifest(), bravo.manifest()]);

    let matrix = interop::run(&ctx).await;

    assert_eq!(matrix.title, interop::TITLE);
    assert_eq!(matrix.columns, vec!["Alpha", "Bravo"]);
    assert_eq!(
        matrix.rows,
        vec![verify_title("Alpha"), revoke_title("Alpha"), verify_title("Bravo"), revoke_title("Bravo")]
    );
    for cell in &matrix.cells {
        assert_eq!(cell.outcome.state, State::Passed, "{} / {}: {:?}", cell.row_id, cell.column_id, cell.outcome.error);
    }
    assert_eq!(matrix.summary().passed, 8);
}

// A verifier that ignores credential status fails only the revocation tests.
#[tokio::test]
async fn verifier_ignoring_status() {
    let alpha = MockImplementation::start("Alpha").await.expect("should start Alpha");
    let bravo =
        MockImplementation::with_modes("Bravo", IssuerMode::Conformant, VerifierMode::IgnoreStatus)
            .await
            .expect("should start Bravo");
    let ctx = context([alpha.manifest(), bravo.manifest()]);

    let matrix = interop::run(&ctx).await;

    for issuer in ["Alpha", "Bravo"] {
        assert_eq!(state(&matrix, &verify_title(issuer), "Alpha"), State::Passed);
        assert_eq!(state(&matrix, &verify_title(issuer), "Bravo"), State::Passed);
        assert_eq!(state(&matrix, &revoke_title(issuer), "Alpha"), State::Passed);
        assert_eq!(state(&matrix, &revoke_title(issuer), "Bravo"), State::Failed);
        assert!(
            error(&matrix, &revoke_title(issuer), "Bravo")
                .starts_with("verifying revoked should fail but returned 200 OK")
        );
    }
}

// Revoking in one cell must not leak into the next: each revocation test
// issues its own credential.
#[tokio::test]
async fn revocation_cells_are_independent() {
    let alpha = MockImplementation::start("Alpha").await.expect("should start Alpha");
    let bravo = MockImplementation::start("Bravo").await.expect("should start Bravo");
    let charlie = MockImplementation::start("Charlie").await.expect("should start Charlie");
    let ctx = context([alpha.manifest(), bravo.manifest(), charlie.manifest()]);

    let matrix = interop::run(&ctx).await;

    for verifier in ["Alpha", "Bravo", "Charlie"] {
        assert_eq!(state(&matrix, &revoke_title("Alpha"), verifier), State::Passed);
    }
}

// An unreachable issuer fails its row without affecting other rows.
#[tokio::test]
async fn unreachable_issuer() {
    let alpha = MockImplementation::start("Alpha").await.expect("should start Alpha");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("should bind");
    let addr = listener.local_addr().expect("should have address");
    drop(listener);
    let offline = Manifest {
        name: "Offline".into(),
        implementation: None,
        issuers: vec![
            EndpointSettings::new(format!("http://{addr}/credentials/issue"))
                .id("did:example:offline")
                .tag("StatusList2021"),
        ],
        verifiers: vec![],
    };
    let ctx = context([alpha.manifest(), offline]);

    let matrix = interop::run(&ctx).await;

    assert_eq!(state(&matrix, &verify_title("Offline"), "Alpha"), State::Failed);
    assert!(error(&matrix, &verify_title("Offline"), "Alpha").starts_with("issuer should issue a credential"));
    assert_eq!(state(&matrix, &revoke_title("Offline"), "Alpha"), State::Failed);

    // Offline has no verifier
    assert_eq!(state(&matrix, &verify_title("Alpha"), "Offline"), State::Pending);
    assert_eq!(state(&matrix, &verify_title("Alpha"), "Alpha"), State::Passed);
}

// Implementations without a tagged issuer are not tested.
#[tokio::test]
async fn untagged_implementation_excluded() {
    let alpha = MockImplementation::start("Alpha").await.expect("should start Alpha");
    let bravo = MockImplementation::start("Bravo").await.expect("should start Bravo");
    let mut untagged = bravo.manifest();
    untagged.issuers[0].tags.clear();

    let ctx = context([alpha.manifest(), untagged]);
    let matrix = interop::run(&ctx).await;

    assert_eq!(matrix.columns, vec!["Alpha"]);
    assert_eq!(matrix.rows, vec![verify_title("Alpha"), revoke_title("Alpha")]);
}

#[tokio::test]
async fn run_selected_suites() {
    let alpha = MockImplementation::start("Alpha").await.expect("should start Alpha");
    let ctx = context([alpha.manifest()]);

    let report = credibil_interop::run(&ctx, SuiteSelection::Interop).await;
    assert_eq!(report.suites.len(), 1);
    assert_eq!(report.suites[0].title, interop::TITLE);
    assert!(!report.failed());

    let report = credibil_interop::run(&ctx, SuiteSelection::All).await;
    assert_eq!(report.suites.len(), 2);
    assert!(!report.failed());
}
