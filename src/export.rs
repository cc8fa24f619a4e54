//! CSV export of tables, views and queries.

use std::{
    fs,
    path::{Path, PathBuf}
};

use rusqlite::Connection;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    config::ExportTarget,
    error::{AppResult, file_write_error},
    output::format_csv,
    table::fetch
};

/// Result of exporting one target
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub name:   String,
    pub path:   PathBuf,
    /// Row count on success, error message otherwise
    pub result: Result<usize, String>
}

impl ExportOutcome {
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

/// Export one target to `<dir>/<name>.csv`, returning the row count
pub fn export_target(conn: &Connection, target: &ExportTarget, dir: &Path) -> AppResult<usize> {
    let rows = fetch(conn, &target.query)?;
    let path = csv_path(dir, &target.name);
    fs::write(&path, format_csv(&rows))
        .map_err(|e| file_write_error(&path.display().to_string(), e))?;
    Ok(rows.row_count())
}

/// Export every target, continuing past failures
///
/// `on_progress` is called with each target before it is exported. Only a
/// missing output directory that cannot be created is fatal.
pub fn export_all(
    conn: &Connection,
    targets: &[ExportTarget],
    dir: &Path,
    mut on_progress: impl FnMut(usize, &ExportTarget)
) -> AppResult<Vec<ExportOutcome>> {
    fs::create_dir_all(dir).map_err(|e| file_write_error(&dir.display().to_string(), e))?;

    let mut outcomes = Vec::with_capacity(targets.len());
    for (i, target) in targets.iter().enumerate() {
        on_progress(i, target);
        let result = match export_target(conn, target, dir) {
            Ok(rows) => {
                info!(target = %target.name, rows, "exported");
                Ok(rows)
            }
            Err(e) => {
                warn!(target = %target.name, error = %e, "export failed");
                Err(e.to_string())
            }
        };
        outcomes.push(ExportOutcome {
            name: target.name.clone(),
            path: csv_path(dir, &target.name),
            result
        });
    }
    Ok(outcomes)
}

fn csv_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.csv", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_path() {
        assert_eq!(
            csv_path(Path::new("out"), "risk_segments"),
            PathBuf::from("out/risk_segments.csv")
        );
    }
}
