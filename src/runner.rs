//! Statement-by-statement execution of SQL scripts.
//!
//! [`run_script`] checks and reads the script, opens the database and runs
//! every executable candidate in order. The store runs in autocommit mode,
//! so each statement is committed as soon as it succeeds. A statement the
//! store rejects is recorded as [`StatementOutcome::Failed`] and logged, and
//! the batch moves on.
//!
//! Only two conditions stop a run: a script that cannot be read (checked
//! before the database is touched) and a database that cannot be opened.
//!
//! The returned [`ScriptRunner`] keeps the connection open for follow-up
//! queries. Dropping it closes the connection.
//!
//! ```
//! use sql_batch_runner::{runner::ScriptRunner, script::SplitMode};
//!
//! let runner = ScriptRunner::open_in_memory().unwrap();
//! let report = runner
//!     .execute_script("CREATE TABLE t (x INT); INSERT INTO t VALUES (1); SELEC 2;", SplitMode::Tokenized)
//!     .unwrap();
//!
//! assert_eq!(report.committed_count(), 2);
//! assert_eq!(report.failed_count(), 1);
//! ```

mod types;

use std::{
    fs,
    path::{Path, PathBuf}
};

use rusqlite::Connection;
use tracing::{debug, error, info, warn};
pub use types::{ExecutionReport, RunnerConfig, StatementOutcome};

use crate::{
    error::{AppResult, connection_error, file_read_error, missing_script_error},
    script::{Candidate, SplitMode, Statement, split_script}
};

/// Open connection plus the path it was opened from
pub struct ScriptRunner {
    conn:          Connection,
    database_path: Option<PathBuf>
}

impl ScriptRunner {
    /// Open (or create) the database file
    pub fn open(path: &Path) -> AppResult<Self> {
        let conn = Connection::open(path).map_err(|e| {
            error!(database = %path.display(), "failed to open database");
            connection_error(&path.display().to_string(), e)
        })?;
        Ok(Self {
            conn,
            database_path: Some(path.to_path_buf())
        })
    }

    /// Runner over a private in-memory database
    pub fn open_in_memory() -> AppResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| connection_error(":memory:", e))?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            database_path: None
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn database_path(&self) -> Option<&Path> {
        self.database_path.as_deref()
    }

    /// Split and execute a script held in memory
    pub fn execute_script(&self, sql: &str, mode: SplitMode) -> AppResult<ExecutionReport> {
        let batch = split_script(sql, mode)?;
        Ok(self.execute_batch(&batch))
    }

    /// Execute candidates in order, recording one outcome per statement
    pub fn execute_batch(&self, batch: &[Candidate]) -> ExecutionReport {
        let mut report = ExecutionReport::new();
        for candidate in batch {
            let Some(stmt) = candidate.statement() else {
                report.skipped += 1;
                continue;
            };
            let outcome = match self.execute_statement(stmt) {
                Ok(changes) => {
                    debug!(ordinal = stmt.ordinal, kind = %stmt.kind, changes, "statement committed");
                    StatementOutcome::Committed {
                        ordinal: stmt.ordinal,
                        kind: stmt.kind,
                        sql: stmt.sql.clone(),
                        changes
                    }
                }
                Err(e) => {
                    warn!(ordinal = stmt.ordinal, error = %e, "statement {} failed", stmt.ordinal);
                    StatementOutcome::Failed {
                        ordinal: stmt.ordinal,
                        kind:    stmt.kind,
                        sql:     stmt.sql.clone(),
                        message: e.to_string()
                    }
                }
            };
            report.push(outcome);
        }
        report
    }

    /// Execute one statement, stepping through any rows it returns
    pub fn execute_statement(&self, stmt: &Statement) -> rusqlite::Result<usize> {
        let mut prepared = self.conn.prepare(&stmt.sql)?;
        if prepared.column_count() == 0 {
            let changes = prepared.execute([])?;
            return Ok(if stmt.kind.is_dml() { changes } else { 0 });
        }
        let mut rows = prepared.query([])?;
        while rows.next()?.is_some() {}
        Ok(0)
    }

    /// Close the connection, surfacing errors that a drop would swallow
    pub fn close(self) -> AppResult<()> {
        let path = self
            .database_path
            .as_ref()
            .map_or_else(|| ":memory:".to_string(), |p| p.display().to_string());
        self.conn
            .close()
            .map_err(|(_, e)| connection_error(&path, e))
    }
}

/// Fail unless the script file exists
pub fn ensure_script_exists(path: &Path) -> AppResult<()> {
    if path.exists() {
        Ok(())
    } else {
        error!(script = %path.display(), "SQL script not found");
        Err(missing_script_error(&path.display().to_string()))
    }
}

/// Execute the configured script against the configured database
///
/// The script is checked, read and split before the database is opened, so
/// a missing or unreadable script never creates or touches the store.
pub fn run_script(config: &RunnerConfig) -> AppResult<(ScriptRunner, ExecutionReport)> {
    ensure_script_exists(&config.script_path)?;
    let sql = fs::read_to_string(&config.script_path)
        .map_err(|e| file_read_error(&config.script_path.display().to_string(), e))?;
    let batch = split_script(&sql, config.split_mode)?;

    info!(
        script = %config.script_path.display(),
        database = %config.database_path.display(),
        split = %config.split_mode,
        candidates = batch.len(),
        "executing script"
    );
    let runner = ScriptRunner::open(&config.database_path)?;
    let report = runner.execute_batch(&batch);
    info!(
        committed = report.committed_count(),
        failed = report.failed_count(),
        skipped = report.skipped,
        "script finished"
    );
    Ok((runner, report))
}
