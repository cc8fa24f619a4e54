//! # SQL Batch Runner
//!
//! Execute SQL cleaning scripts against a SQLite database, then report on
//! and export the cleaned data.
//!
//! The core is the script runner: a script is cut into statements (see
//! [`script`]) and each statement is executed and committed on its own (see
//! [`runner`]). A statement the database rejects does not stop the run; it
//! is recorded in the returned [`runner::ExecutionReport`] so the caller can
//! decide whether the run counts as a failure.
//!
//! # Quick Start
//!
//! ```bash
//! # Run the cleaning script, print failures and table counts
//! sql-batch-runner clean -d database/loan_data.db -s sql/clean_data.sql
//!
//! # Fail the process when any statement failed
//! sql-batch-runner clean --strict -f json
//!
//! # Analysis report, saved under analysis_results/
//! sql-batch-runner report
//!
//! # CSV files for the dashboard
//! sql-batch-runner export -o powerbi_exports
//! ```
//!
//! # Modules
//!
//! - [`script`] - Statement boundary detection
//! - [`runner`] - Statement-by-statement execution and reports
//! - [`table`] - Result sets fetched from the database
//! - [`report`] - Analytical report sections
//! - [`export`] - CSV export
//! - [`output`] - Text, JSON, YAML and CSV rendering
//! - [`config`] - Configuration loading
//! - [`app`] - Subcommand orchestration
//! - [`error`] - Error types and constructors

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod output;
pub mod report;
pub mod runner;
pub mod script;
pub mod table;
