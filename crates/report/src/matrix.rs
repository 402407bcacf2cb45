//! # Interop Matrix
//!
//! Results of a suite laid out as a table: one row per test, one column per
//! implementation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The result state of a single test.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// Every assertion held.
    Passed,

    /// An assertion failed or the implementation could not be reached.
    Failed,

    /// The test was not run.
    Pending,
}

/// The outcome of a single test.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// Result state.
    pub state: State,

    /// Wall-clock time spent running the test.
    #[serde(with = "millis")]
    pub duration: Duration,

    /// The first failed assertion, or the reason the test is pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    /// A passing outcome.
    #[must_use]
    pub const fn passed(duration: Duration) -> Self {
        Self { state: State::Passed, duration, error: None }
    }

    /// A failing outcome.
    #[must_use]
    pub fn failed(duration: Duration, error: impl Into<String>) -> Self {
        Self { state: State::Failed, duration, error: Some(error.into()) }
    }

    /// A test that was not run.
    #[must_use]
    pub fn pending(reason: impl Into<String>) -> Self {
        Self { state: State::Pending, duration: Duration::ZERO, error: Some(reason.into()) }
    }
}

/// A matrix cell.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Test title.
    pub row_id: String,

    /// Implementation name.
    pub column_id: String,

    /// The test outcome.
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Pass/fail counts for a matrix.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Summary {
    /// Passing cells.
    pub passed: usize,

    /// Failing cells.
    pub failed: usize,

    /// Cells that were not run.
    pub pending: usize,
}

/// A suite's results.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Matrix {
    /// Suite title.
    pub title: String,

    /// Heading for the row labels.
    pub row_label: String,

    /// Heading for the columns.
    pub column_label: String,

    /// Column names, in first-seen order.
    pub columns: Vec<String>,

    /// Row names, in first-seen order.
    pub rows: Vec<String>,

    /// Recorded results.
    pub cells: Vec<Cell>,
}

impl Matrix {
    /// Create an empty matrix with the default "Test Name" and
    /// "Implementation" labels.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            row_label: "Test Name".into(),
            column_label: "Implementation".into(),
            columns: vec![],
            rows: vec![],
            cells: vec![],
        }
    }

    /// Set the heading for row labels.
    #[must_use]
    pub fn row_label(mut self, label: impl Into<String>) -> Self {
        self.row_label = label.into();
        self
    }

    /// Set the heading for columns.
    #[must_use]
    pub fn column_label(mut self, label: impl Into<String>) -> Self {
        self.column_label = label.into();
        self
    }

    /// Add a column, ignoring duplicates.
    pub fn add_column(&mut self, column: &str) {
        if !self.columns.iter().any(|c| c == column) {
            self.columns.push(column.to_string());
        }
    }

    /// Add a row, ignoring duplicates.
    pub fn add_row(&mut self, row: &str) {
        if !self.rows.iter().any(|r| r == row) {
            self.rows.push(row.to_string());
        }
    }

    /// Record the outcome of the test at `row` for implementation `column`,
    /// replacing any earlier result for the same cell.
    pub fn record(&mut self, row: &str, column: &str, outcome: Outcome) {
        self.add_row(row);
        self.add_column(column);

        if let Some(cell) = self.cells.iter_mut().find(|c| c.row_id == row && c.column_id == column)
        {
            cell.outcome = outcome;
            return;
        }
        self.cells.push(Cell { row_id: row.to_string(), column_id: column.to_string(), outcome });
    }

    /// The result recorded for a cell.
    #[must_use]
    pub fn cell(&self, row: &str, column: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.row_id == row && c.column_id == column)
    }

    /// Count results by state.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.cells.iter().fold(Summary::default(), |mut summary, cell| {
            match cell.outcome.state {
                State::Passed => summary.passed += 1,
                State::Failed => summary.failed += 1,
                State::Pending => summary.pending += 1,
            }
            summary
        })
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_yaml_snapshot as assert_snapshot;

    use super::*;

    #[test]
    fn record_dedups_rows_and_columns() {
        let mut matrix = Matrix::new("StatusList2021 Credentials (Interop)");
        matrix.record("MUST verify", "Alpha", Outcome::passed(Duration::from_millis(5)));
        matrix.record("MUST verify", "Bravo", Outcome::failed(Duration::ZERO, "expected 200"));
        matrix.record("MUST revoke", "Alpha", Outcome::pending("issuer unavailable"));
        matrix.record("MUST verify", "Bravo", Outcome::passed(Duration::ZERO));

        assert_eq!(matrix.columns, vec!["Alpha", "Bravo"]);
        assert_eq!(matrix.rows, vec!["MUST verify", "MUST revoke"]);
        assert_eq!(matrix.cells.len(), 3);

        let cell = matrix.cell("MUST verify", "Bravo").expect("should have cell");
        assert_eq!(cell.outcome.state, State::Passed);

        assert_eq!(matrix.summary(), Summary { passed: 2, failed: 0, pending: 1 });
    }

    #[test]
    fn cell_json() {
        let mut matrix = Matrix::new("Suite");
        matrix.record("MUST verify", "Alpha", Outcome::failed(Duration::from_millis(1500), "boom"));

        assert_snapshot!(&matrix.cells[0], @r"
        rowId: MUST verify
        columnId: Alpha
        state: failed
        duration: 1500
        error: boom
        ");

        let value = serde_json::to_value(&matrix.cells[0]).expect("should serialize");
        let cell: Cell = serde_json::from_value(value).expect("should deserialize");
        assert_eq!(cell, matrix.cells[0]);
    }
}
