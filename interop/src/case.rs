//! Test case execution.

use std::time::Instant;

use anyhow::Result;
use credibil_interop_report::{Matrix, Outcome};

/// Run a single test case and record its outcome in the matrix cell at
/// `row` (test title) and `column` (implementation name).
pub async fn run(
    matrix: &mut Matrix, row: &str, column: &str, test: impl Future<Output = Result<()>>,
) {
    let start = Instant::now();
    let outcome = match test.await {
        Ok(()) => {
            tracing::info!(row, column, "passed");
            Outcome::passed(start.elapsed())
        }
        Err(e) => {
            let error = format!("{e:#}");
            tracing::warn!(row, column, error = error.as_str(), "failed");
            Outcome::failed(start.elapsed(), error)
        }
    };
    matrix.record(row, column, outcome);
}

#[cfg(test)]
mod tests {
    use anyhow::bail;
    use credibil_interop_report::State;

    use super::*;

    #[tokio::test]
    async fn records_outcomes() {
        let mut matrix = Matrix::new("Suite");
        run(&mut matrix, "MUST pass", "Alpha", async { Ok(()) }).await;
        run(&mut matrix, "MUST fail", "Alpha", async { bail!("expected status 200 OK") }).await;

        let passed = matrix.cell("MUST pass", "Alpha").expect("should have cell");
        assert_eq!(passed.outcome.state, State::Passed);

        let failed = matrix.cell("MUST fail", "Alpha").expect("should have cell");
        assert_eq!(failed.outcome.state, State::Failed);
        assert_eq!(failed.outcome.error.as_deref(), Some("expected status 200 OK"));
    }
}
