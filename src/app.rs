//! Application logic for the SQL Batch Runner CLI.
//!
//! Each subcommand has a `run_*` function that takes its parameters and the
//! loaded [`Config`](crate::config::Config) and returns the text to print
//! together with the process exit code. Keeping this out of `main` makes the
//! commands testable without spawning the binary.

mod clean;
mod convert;
mod export;
mod helpers;
mod report;
mod types;

pub use clean::run_clean;
pub use convert::{convert_format, convert_split};
pub use export::run_export;
pub use helpers::{
    calculate_exit_code, close_warning, collect_summary, collect_view_summary,
    create_output_options, resolve_path, resolve_runner_config
};
pub use report::run_report;
pub use types::{
    CleanOutput, CleanParams, ExportOutput, ExportParams, ReportOutput, ReportParams
};
