//! Application types for CLI commands.
//!
//! Parameters mirror the command-line flags of each subcommand; a `None`
//! path falls back to the configuration. Outputs carry the rendered text and
//! the exit code the process should end with.

use std::path::PathBuf;

use crate::{
    cli::{Format, Split},
    export::ExportOutcome,
    output::{TableSummary, ViewSummary},
    runner::ExecutionReport
};

/// Parameters for the clean command.
///
/// # Example
///
/// ```
/// use sql_batch_runner::{
///     app::CleanParams,
///     cli::{Format, Split}
/// };
///
/// let params = CleanParams {
///     database:      Some("database/loan_data.db".into()),
///     script:        Some("sql/clean_data.sql".into()),
///     split:         Some(Split::Tokenized),
///     summary:       vec![],
///     summary_view:  None,
///     strict:        false,
///     output_format: Format::Text,
///     no_color:      true,
///     verbose:       false
/// };
/// ```
#[derive(Debug, Clone)]
pub struct CleanParams {
    /// Database file, overrides the configured one.
    pub database:      Option<PathBuf>,
    /// Script file, overrides the configured one.
    pub script:        Option<PathBuf>,
    /// Splitting strategy, overrides the configured one.
    pub split:         Option<Split>,
    /// Tables to count afterwards; empty means the configured list.
    pub summary:       Vec<String>,
    /// Summary view, overrides the configured one.
    pub summary_view:  Option<String>,
    /// Treat any failed statement as a failed run.
    pub strict:        bool,
    pub output_format: Format,
    pub no_color:      bool,
    /// List committed statements too.
    pub verbose:       bool
}

/// Result of the clean command.
#[derive(Debug, Clone)]
pub struct CleanOutput {
    /// 0 on success; 1 in strict mode when a statement failed.
    pub exit_code:   i32,
    pub output:      String,
    pub execution:   ExecutionReport,
    pub summary:     Vec<TableSummary>,
    pub view:        Option<ViewSummary>,
    /// Set when the database could not be closed cleanly
    pub close_error: Option<String>
}

/// Parameters for the report command.
#[derive(Debug, Clone)]
pub struct ReportParams {
    pub database:   Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub no_color:   bool
}

/// Result of the report command.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    /// 1 when any section query failed.
    pub exit_code: i32,
    pub output:    String,
    /// Where the plain-text report was saved
    pub path:      PathBuf
}

/// Parameters for the export command.
#[derive(Debug, Clone)]
pub struct ExportParams {
    pub database:   Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub no_color:   bool
}

/// Result of the export command.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    /// 1 when any target failed.
    pub exit_code: i32,
    pub output:    String,
    pub outcomes:  Vec<ExportOutcome>
}
