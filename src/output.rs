use colored::Colorize;
use serde::Serialize;

use crate::{
    runner::{ExecutionReport, StatementOutcome},
    table::{ResultSet, Value}
};

/// Width of the `=` bars framing report sections
pub const BAR_WIDTH: usize = 80;

/// Output format for results
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

/// Row count of a summary table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableSummary {
    pub table: String,
    /// `None` when the table is missing or could not be counted
    pub rows:  Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>
}

/// First row of the summary view, shown after the table counts
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ViewSummary {
    pub view:  String,
    /// `None` when the view is missing or could not be read
    pub row:   Option<ResultSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>
}

/// Clean command result for serialization
#[derive(Debug, Serialize)]
pub struct CleanResult<'a> {
    pub execution: &'a ExecutionReport,
    pub summary:   &'a [TableSummary],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view:      Option<&'a ViewSummary>
}

/// Format the outcome of a script run plus table and view summaries
pub fn format_clean_result(
    report: &ExecutionReport,
    summary: &[TableSummary],
    view: Option<&ViewSummary>,
    opts: &OutputOptions
) -> String {
    let result = CleanResult {
        execution: report,
        summary,
        view
    };
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(&result).unwrap_or_default(),
        OutputFormat::Text => {
            let mut output = format_execution_text(report, opts);
            if !summary.is_empty() {
                output.push('\n');
                output.push_str(&format_summary_text(summary, opts));
            }
            if let Some(view) = view {
                output.push('\n');
                output.push_str(&format_view_text(view, opts));
            }
            output
        }
    }
}

fn format_execution_text(report: &ExecutionReport, opts: &OutputOptions) -> String {
    let mut output = String::new();
    let header = "=== Script Execution ===";
    if opts.colored {
        output.push_str(&header.bold().to_string());
    } else {
        output.push_str(header);
    }
    output.push_str("\n\n");

    for outcome in &report.outcomes {
        match outcome {
            StatementOutcome::Committed {
                ordinal,
                kind,
                changes,
                ..
            } if opts.verbose => {
                let line = format!("  ok   #{} {} ({} rows changed)", ordinal, kind, changes);
                if opts.colored {
                    output.push_str(&line.green().to_string());
                } else {
                    output.push_str(&line);
                }
                output.push('\n');
            }
            StatementOutcome::Committed { .. } => {}
            StatementOutcome::Failed {
                ordinal,
                kind,
                sql,
                message
            } => {
                let line = format!("  FAIL #{} {}: {}", ordinal, kind, message);
                if opts.colored {
                    output.push_str(&line.red().to_string());
                } else {
                    output.push_str(&line);
                }
                output.push('\n');
                output.push_str(&format!("       {}\n", first_line(sql)));
            }
        }
    }

    let totals = format!(
        "Statements: {} executed, {} committed, {} failed, {} skipped",
        report.executed_count(),
        report.committed_count(),
        report.failed_count(),
        report.skipped
    );
    if !report.outcomes.is_empty() && (opts.verbose || !report.is_success()) {
        output.push('\n');
    }
    if opts.colored && !report.is_success() {
        output.push_str(&totals.yellow().to_string());
    } else {
        output.push_str(&totals);
    }
    output.push('\n');
    output
}

fn format_summary_text(summary: &[TableSummary], opts: &OutputOptions) -> String {
    let mut output = String::from("Summary:\n");
    for entry in summary {
        let line = match (&entry.rows, &entry.error) {
            (Some(rows), _) => format!("  {}: {} rows", entry.table, rows),
            (None, Some(error)) => format!("  {}: unavailable ({})", entry.table, error),
            (None, None) => format!("  {}: not yet created", entry.table)
        };
        push_dimmed_unless(&mut output, &line, entry.rows.is_some(), opts);
    }
    output
}

fn format_view_text(view: &ViewSummary, opts: &OutputOptions) -> String {
    let Some(row) = &view.row else {
        let line = match &view.error {
            Some(error) => format!("{}: unavailable ({})", view.view, error),
            None => format!("{}: not yet created", view.view)
        };
        let mut output = String::new();
        push_dimmed_unless(&mut output, &line, false, opts);
        return output;
    };
    let Some(first) = row.rows.first() else {
        return format!("{}: no rows\n", view.view);
    };

    let mut output = format!("{}:\n", view.view);
    for (column, value) in row.columns.iter().zip(first) {
        output.push_str(&format!("  {}: {}\n", column, display_cell(value)));
    }
    output
}

fn push_dimmed_unless(output: &mut String, line: &str, plain: bool, opts: &OutputOptions) {
    if opts.colored && !plain {
        output.push_str(&line.dimmed().to_string());
    } else {
        output.push_str(line);
    }
    output.push('\n');
}

fn first_line(sql: &str) -> String {
    let mut lines = sql.lines();
    let first = lines.next().unwrap_or_default();
    if lines.next().is_some() {
        format!("{} ...", first)
    } else {
        first.to_string()
    }
}

/// Section header framed by `=` bars
pub fn format_section_header(title: &str, colored: bool) -> String {
    let bar = "=".repeat(BAR_WIDTH);
    let title = if colored {
        title.cyan().bold().to_string()
    } else {
        title.to_string()
    };
    format!("{}\n{}\n{}", bar, title, bar)
}

/// Render a result set as a right-aligned text table
///
/// Every column is as wide as its widest cell or header and columns are
/// separated by a single space, without an index column.
pub fn format_table(result: &ResultSet) -> String {
    if result.columns.is_empty() {
        return String::from("(no columns)");
    }

    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(display_cell).collect())
        .collect();

    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(cells.len() + 1);
    lines.push(align_row(result.columns.iter().map(String::as_str), &widths));
    for row in &cells {
        lines.push(align_row(row.iter().map(String::as_str), &widths));
    }
    if cells.is_empty() {
        lines.push(String::from("(no rows)"));
    }
    lines.join("\n")
}

fn display_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("NULL"),
        other => other.to_string()
    }
}

fn align_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Encode a result set as CSV with a header line
///
/// Fields containing a comma, quote or line break are quoted with inner
/// quotes doubled. NULL becomes an empty field.
pub fn format_csv(result: &ResultSet) -> String {
    let mut output = String::new();
    let header: Vec<String> = result.columns.iter().map(|c| csv_field(c)).collect();
    output.push_str(&header.join(","));
    output.push('\n');
    for row in &result.rows {
        let fields: Vec<String> = row.iter().map(|v| csv_field(&v.to_string())).collect();
        output.push_str(&fields.join(","));
        output.push('\n');
    }
    output
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("SELECT 1"), "SELECT 1");
        assert_eq!(first_line("SELECT\n  1"), "SELECT ...");
    }

    #[test]
    fn test_section_header_plain() {
        let header = format_section_header("RISK", false);
        let lines: Vec<_> = header.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), BAR_WIDTH);
        assert_eq!(lines[1], "RISK");
    }
}
