//! Analytical report over a cleaned database.
//!
//! Each configured [`ReportSection`] is one query. Results are rendered as
//! aligned text tables under `=`-framed headers. A failing query is shown in
//! place of its table and the remaining sections still run.

use std::{
    fs,
    path::{Path, PathBuf}
};

use chrono::{DateTime, Local};
use rusqlite::Connection;
use tracing::warn;

use crate::{
    config::ReportSection,
    error::{AppResult, file_write_error},
    output::{BAR_WIDTH, format_section_header, format_table},
    table::{ResultSet, fetch}
};

/// One executed section
#[derive(Debug, Clone)]
pub struct SectionResult {
    pub title:  String,
    /// Rows on success, error message otherwise
    pub result: Result<ResultSet, String>
}

/// Run every section query in order
pub fn run_sections(conn: &Connection, sections: &[ReportSection]) -> Vec<SectionResult> {
    sections
        .iter()
        .map(|section| {
            let result = fetch(conn, &section.query).map_err(|e| {
                warn!(section = %section.title, error = %e, "report query failed");
                e.to_string()
            });
            SectionResult {
                title: section.title.clone(),
                result
            }
        })
        .collect()
}

/// Banner written at the top of the saved report
pub fn format_banner(title: &str, generated_at: &DateTime<Local>) -> String {
    let bar = "=".repeat(BAR_WIDTH);
    format!(
        "{}\n{}\nGenerated: {}\n{}\n",
        bar,
        title,
        generated_at.format("%Y-%m-%d %H:%M:%S"),
        bar
    )
}

/// Render all sections, blank line between them
pub fn format_sections(results: &[SectionResult], colored: bool) -> String {
    results
        .iter()
        .map(|section| {
            let body = match &section.result {
                Ok(rows) => format_table(rows),
                Err(message) => format!("Query failed: {}", message)
            };
            format!("{}\n{}", format_section_header(&section.title, colored), body)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// File name of a report generated at the given time
pub fn report_file_name(generated_at: &DateTime<Local>) -> String {
    format!(
        "statistical_insights_{}.txt",
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

/// Write the plain-text report into `dir`, creating it when missing
pub fn save_report(dir: &Path, generated_at: &DateTime<Local>, content: &str) -> AppResult<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| file_write_error(&dir.display().to_string(), e))?;
    let path = dir.join(report_file_name(generated_at));
    fs::write(&path, content).map_err(|e| file_write_error(&path.display().to_string(), e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE risk (Risk_Category TEXT, TotalIncome REAL);
             INSERT INTO risk VALUES ('Low', 9000.5), ('High', 1200.0), ('Low', 7000.0);"
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(
            report_file_name(&fixed_time()),
            "statistical_insights_20240309_140507.txt"
        );
    }

    #[test]
    fn test_banner() {
        let banner = format_banner("LOAN REPORT", &fixed_time());
        assert!(banner.contains("LOAN REPORT\nGenerated: 2024-03-09 14:05:07\n"));
    }

    #[test]
    fn test_failing_section_does_not_stop_report() {
        let sections = vec![
            ReportSection::new("MISSING", "SELECT * FROM nowhere"),
            ReportSection::new(
                "COUNTS",
                "SELECT Risk_Category, COUNT(*) AS Count FROM risk GROUP BY Risk_Category ORDER BY Count DESC"
            )
        ];
        let results = run_sections(&conn(), &sections);
        assert_eq!(results.len(), 2);
        assert!(results[0].result.is_err());
        let rows = results[1].result.as_ref().unwrap();
        assert_eq!(rows.row_count(), 2);

        let text = format_sections(&results, false);
        assert!(text.contains("Query failed:"));
        assert!(text.contains("Risk_Category Count"));
    }
}
