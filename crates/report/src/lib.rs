//! # Interop Report
//!
//! Collects suite results into interop matrices and writes them out as JSON
//! (for tooling) and HTML (for people).

mod html;
mod matrix;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use self::matrix::*;

/// Name of the JSON report file.
pub const JSON_REPORT: &str = "report.json";

/// Name of the HTML report file.
pub const HTML_REPORT: &str = "index.html";

/// The results of a test run.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Report title.
    pub title: String,

    /// When the report was generated.
    pub generated: DateTime<Utc>,

    /// One matrix per suite.
    pub suites: Vec<Matrix>,
}

impl Report {
    /// Create an empty report.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), generated: Utc::now(), suites: vec![] }
    }

    /// Whether any cell in any suite failed.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.suites.iter().any(|m| m.summary().failed > 0)
    }

    /// Combined counts across suites.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.suites.iter().map(Matrix::summary).fold(Summary::default(), |acc, s| Summary {
            passed: acc.passed + s.passed,
            failed: acc.failed + s.failed,
            pending: acc.pending + s.pending,
        })
    }

    /// Render the report as HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        html::render(self)
    }

    /// Write `report.json` and `index.html` to `dir`, creating it if needed.
    /// Returns the paths written.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or files cannot be written.
    pub fn write(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

        let json_path = dir.join(JSON_REPORT);
        let json = serde_json::to_vec_pretty(self).context("serializing report")?;
        fs::write(&json_path, json).with_context(|| format!("writing {}", json_path.display()))?;

        let html_path = dir.join(HTML_REPORT);
        fs::write(&html_path, self.to_html())
            .with_context(|| format!("writing {}", html_path.display()))?;

        tracing::info!(dir = %dir.display(), "report written");
        Ok(vec![json_path, html_path])
    }
}
