//! Helper functions for CLI operations.
//!
//! Path resolution between flags and configuration, exit code calculation
//! and the post-run table summary.

use std::path::PathBuf;

use rusqlite::Connection;
use tracing::warn;

use super::{
    convert::{convert_format, convert_split},
    types::CleanParams
};
use crate::{
    cli::Format,
    config::Config,
    error::AppResult,
    output::{OutputOptions, TableSummary, ViewSummary},
    runner::{ExecutionReport, RunnerConfig},
    table::{count_rows, fetch, quote_identifier, table_exists}
};

/// Calculates the process exit code of a script run.
///
/// A tolerant run always exits with `0`. In strict mode any failed
/// statement turns the exit code into `1`.
///
/// # Example
///
/// ```
/// use sql_batch_runner::{app::calculate_exit_code, runner::ExecutionReport};
///
/// let report = ExecutionReport::new();
/// assert_eq!(calculate_exit_code(&report, true), 0);
/// ```
pub fn calculate_exit_code(report: &ExecutionReport, strict: bool) -> i32 {
    if strict && !report.is_success() { 1 } else { 0 }
}

/// Flag value if given, configured value otherwise
pub fn resolve_path(flag: Option<PathBuf>, configured: &str) -> PathBuf {
    flag.unwrap_or_else(|| PathBuf::from(configured))
}

/// Build the runner inputs from flags and configuration
pub fn resolve_runner_config(params: &CleanParams, config: &Config) -> RunnerConfig {
    RunnerConfig {
        script_path:   resolve_path(params.script.clone(), &config.clean.script),
        database_path: resolve_path(params.database.clone(), &config.database.path),
        split_mode:    params
            .split
            .map(convert_split)
            .unwrap_or(config.clean.split)
    }
}

/// Count rows of each table, marking missing ones instead of failing
///
/// A table that exists but cannot be counted is logged and carries the
/// error, so it is not confused with one that was never created.
pub fn collect_summary(conn: &Connection, tables: &[String]) -> Vec<TableSummary> {
    tables
        .iter()
        .map(|table| {
            let counted = table_exists(conn, table).and_then(|exists| {
                if exists {
                    count_rows(conn, table).map(Some)
                } else {
                    Ok(None)
                }
            });
            match counted {
                Ok(rows) => TableSummary {
                    table: table.clone(),
                    rows,
                    error: None
                },
                Err(e) => {
                    warn!(table = %table, error = %e, "failed to count summary table");
                    TableSummary {
                        table: table.clone(),
                        rows:  None,
                        error: Some(e.to_string())
                    }
                }
            }
        })
        .collect()
}

/// Fetch the first row of the summary view
pub fn collect_view_summary(conn: &Connection, view: &str) -> ViewSummary {
    let fetched = table_exists(conn, view).and_then(|exists| {
        if exists {
            fetch(conn, &format!("SELECT * FROM {} LIMIT 1", quote_identifier(view))).map(Some)
        } else {
            Ok(None)
        }
    });
    match fetched {
        Ok(row) => ViewSummary {
            view: view.to_string(),
            row,
            error: None
        },
        Err(e) => {
            warn!(view = %view, error = %e, "failed to read summary view");
            ViewSummary {
                view:  view.to_string(),
                row:   None,
                error: Some(e.to_string())
            }
        }
    }
}

/// Log a failed close; the run itself already completed
pub fn close_warning(closed: AppResult<()>) -> Option<String> {
    match closed {
        Ok(()) => None,
        Err(e) => {
            warn!(error = %e, "failed to close database");
            Some(e.to_string())
        }
    }
}

/// Create output options from parameters
pub fn create_output_options(format: Format, no_color: bool, verbose: bool) -> OutputOptions {
    OutputOptions {
        format: convert_format(format),
        colored: !no_color,
        verbose
    }
}
