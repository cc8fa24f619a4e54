//! Report command: analytical queries rendered to console and file.

use chrono::Local;

use super::{
    helpers::resolve_path,
    types::{ReportOutput, ReportParams}
};
use crate::{
    config::Config,
    error::AppResult,
    report::{format_banner, format_sections, run_sections, save_report},
    table::open_read_only
};

/// Runs every configured report section against the database.
///
/// The console gets the sections (colored unless disabled); the saved file
/// gets a title banner with the generation time followed by the same
/// sections in plain text.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the report file
/// cannot be written. Failing section queries are rendered in place.
pub fn run_report(params: ReportParams, config: &Config) -> AppResult<ReportOutput> {
    let database = resolve_path(params.database, &config.database.path);
    let output_dir = resolve_path(params.output_dir, &config.report.output_dir);
    let conn = open_read_only(&database)?;

    let generated_at = Local::now();
    let results = run_sections(&conn, &config.report.sections);

    let file_content = format!(
        "{}\n{}\n",
        format_banner(&config.report.title, &generated_at),
        format_sections(&results, false)
    );
    let path = save_report(&output_dir, &generated_at, &file_content)?;

    let mut output = format_sections(&results, !params.no_color);
    output.push_str(&format!(
        "\n\n{}\nAnalysis complete!\nFull report saved to: {}\n",
        "=".repeat(crate::output::BAR_WIDTH),
        path.display()
    ));

    let exit_code = if results.iter().any(|s| s.result.is_err()) { 1 } else { 0 };
    Ok(ReportOutput {
        exit_code,
        output,
        path
    })
}
