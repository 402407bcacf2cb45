//! Issue suite tests against mock implementations.

use credibil_interop::Context;
use credibil_interop::suites::issue::{self, DEREFERENCES, HAS_STATUS, SUPPORTED_TYPE};
use credibil_interop_report::State;
use credibil_interop_vcapi::Registry;
use test_utils::{IssuerMode, MockImplementation, VerifierMode};

#[tokio::test]
async fn status_entries() {
    let alpha = MockImplementation::start("Alpha").await.expect("should start Alpha");
    let bravo =
        MockImplementation::with_modes("Bravo", IssuerMode::NoStatus, VerifierMode::Conformant)
            .await
            .expect("should start Bravo");

    let http = reqwest::Client::new();
    let registry = Registry::from_manifests([alpha.manifest(), bravo.manifest()], &http)
        .expect("should build registry");
    let matrix = issue::run(&Context::new(registry, http)).await;

    assert_eq!(matrix.title, issue::TITLE);
    assert_eq!(matrix.column_label, "Issuer");
    assert_eq!(matrix.rows, vec![HAS_STATUS, SUPPORTED_TYPE, DEREFERENCES]);

    for row in [HAS_STATUS, SUPPORTED_TYPE, DEREFERENCES] {
        let alpha = matrix.cell(row, "Alpha").expect("should have Alpha cell");
        assert_eq!(alpha.outcome.state, State::Passed, "{row}: {:?}", alpha.outcome.error);

        let bravo = matrix.cell(row, "Bravo").expect("should have Bravo cell");
        assert_eq!(bravo.outcome.state, State::Failed, "{row}");
    }

    let summary = matrix.summary();
    assert_eq!((summary.passed, summary.failed, summary.pending), (3, 3, 0));
}
