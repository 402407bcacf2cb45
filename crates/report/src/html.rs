//! HTML rendering of a report.

use std::fmt::Write;

use crate::{Matrix, Report, State};

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
table{border-collapse:collapse;margin-bottom:2em}\
th,td{border:1px solid #ccc;padding:.4em .8em;text-align:left}\
td.passed{color:#176f2c}td.failed{color:#b00020}td.pending{color:#777}";

/// Render the report as a standalone HTML page.
pub(crate) fn render(report: &Report) -> String {
    let mut html = String::new();
    let title = escape(&report.title);

    // writing to a `String` cannot fail
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>{title}</h1>\n<p>Generated {}</p>\n",
        report.generated.to_rfc3339()
    );
    for matrix in &report.suites {
        render_matrix(&mut html, matrix);
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn render_matrix(html: &mut String, matrix: &Matrix) {
    let summary = matrix.summary();
    let _ = write!(
        html,
        "<h2>{}</h2>\n<p>{} passed, {} failed, {} pending</p>\n<table>\n<tr><th>{} \\ {}</th>",
        escape(&matrix.title),
        summary.passed,
        summary.failed,
        summary.pending,
        escape(&matrix.row_label),
        escape(&matrix.column_label),
    );
    for column in &matrix.columns {
        let _ = write!(html, "<th>{}</th>", escape(column));
    }
    html.push_str("</tr>\n");

    for row in &matrix.rows {
        let _ = write!(html, "<tr><th>{}</th>", escape(row));
        for column in &matrix.columns {
            match matrix.cell(row, column) {
                Some(cell) => {
                    let (class, mark) = match cell.outcome.state {
                        State::Passed => ("passed", "&#10003;"),
                        State::Failed => ("failed", "&#10007;"),
                        State::Pending => ("pending", "-"),
                    };
                    let tip = cell.outcome.error.as_deref().map(escape).unwrap_or_default();
                    let _ = write!(html, "<td class=\"{class}\" title=\"{tip}\">{mark}</td>");
                }
                None => html.push_str("<td></td>"),
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
}

/// Escape text for use in HTML content and attribute values.
pub(crate) fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
