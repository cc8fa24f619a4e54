//! Type definitions for script execution.
//!
//! - [`RunnerConfig`] - Explicit inputs of a run
//! - [`StatementOutcome`] - Result of one executed statement
//! - [`ExecutionReport`] - Ordered outcomes of a whole batch

use std::path::PathBuf;

use serde::Serialize;

use crate::script::{SplitMode, StatementKind};

/// Everything a run needs, passed in by the caller.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// SQL script to execute
    pub script_path:   PathBuf,
    /// SQLite database file, created when missing
    pub database_path: PathBuf,
    /// Statement boundary detection
    pub split_mode:    SplitMode
}

/// Result of executing a single statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatementOutcome {
    /// Executed and committed
    Committed {
        ordinal: usize,
        kind:    StatementKind,
        sql:     String,
        /// Rows changed, as reported by the store
        changes: usize
    },
    /// Rejected by the store; the batch continued
    Failed {
        ordinal: usize,
        kind:    StatementKind,
        sql:     String,
        message: String
    }
}

impl StatementOutcome {
    pub fn ordinal(&self) -> usize {
        match self {
            Self::Committed { ordinal, .. } | Self::Failed { ordinal, .. } => *ordinal
        }
    }

    pub fn sql(&self) -> &str {
        match self {
            Self::Committed { sql, .. } | Self::Failed { sql, .. } => sql
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcomes of a batch, in script order.
///
/// Skipped candidates only show up in [`skipped`](Self::skipped). Use
/// [`is_success`](Self::is_success) to decide whether a tolerant run should
/// still be treated as a failure.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionReport {
    pub outcomes: Vec<StatementOutcome>,
    pub skipped:  usize
}

impl ExecutionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: StatementOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn executed_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn committed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failure()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &StatementOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }
}
