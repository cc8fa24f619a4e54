//! Export command: configured targets to CSV files.

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use super::{
    helpers::resolve_path,
    types::{ExportOutput, ExportParams}
};
use crate::{
    config::Config,
    error::AppResult,
    export::{ExportOutcome, export_all},
    output::BAR_WIDTH,
    table::open_read_only
};

/// Exports every configured target into the output directory.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the output
/// directory cannot be created. A failing target is reported in the output
/// and turns the exit code into `1`.
pub fn run_export(params: ExportParams, config: &Config) -> AppResult<ExportOutput> {
    let database = resolve_path(params.database, &config.database.path);
    let output_dir = resolve_path(params.output_dir, &config.export.output_dir);
    let conn = open_read_only(&database)?;
    let targets = &config.export.targets;

    let pb = ProgressBar::new(targets.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{pos}/{len}] {msg}")
    {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));

    let outcomes = export_all(&conn, targets, &output_dir, |i, target| {
        pb.set_position(i as u64);
        pb.set_message(format!("Exporting {}...", target.name));
    })?;
    pb.finish_and_clear();

    let output = format_outcomes(&outcomes, &output_dir.display().to_string(), !params.no_color);
    let exit_code = if outcomes.iter().any(ExportOutcome::is_failure) { 1 } else { 0 };
    Ok(ExportOutput {
        exit_code,
        output,
        outcomes
    })
}

fn format_outcomes(outcomes: &[ExportOutcome], location: &str, colored: bool) -> String {
    let mut output = String::from("Exporting data for dashboards...\n");
    for (i, outcome) in outcomes.iter().enumerate() {
        output.push_str(&format!("\n{}. {}\n", i + 1, outcome.name));
        match &outcome.result {
            Ok(rows) => {
                output.push_str(&format!("   Saved: {}\n", outcome.path.display()));
                output.push_str(&format!("   Records: {}\n", rows));
            }
            Err(message) => {
                let line = format!("   Failed: {}", message);
                if colored {
                    output.push_str(&line.red().to_string());
                } else {
                    output.push_str(&line);
                }
                output.push('\n');
            }
        }
    }

    let failed = outcomes.iter().filter(|o| o.is_failure()).count();
    let bar = "=".repeat(BAR_WIDTH);
    let headline = if failed == 0 {
        String::from("All data exported!")
    } else {
        format!("{} of {} exports failed", failed, outcomes.len())
    };
    output.push_str(&format!("\n{}\n{}\nLocation: {}\n{}\n", bar, headline, location, bar));
    output
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_format_outcomes_mixed() {
        let outcomes = vec![
            ExportOutcome {
                name:   "loan_cleaned".to_string(),
                path:   PathBuf::from("out/loan_cleaned.csv"),
                result: Ok(614)
            },
            ExportOutcome {
                name:   "risk_segments".to_string(),
                path:   PathBuf::from("out/risk_segments.csv"),
                result: Err("no such table: risk_segments".to_string())
            }
        ];
        let text = format_outcomes(&outcomes, "out", false);
        assert!(text.contains("1. loan_cleaned\n   Saved: out/loan_cleaned.csv\n   Records: 614"));
        assert!(text.contains("2. risk_segments\n   Failed: no such table"));
        assert!(text.contains("1 of 2 exports failed"));
    }
}
