//! Clean command: run the cleaning script, then summarize tables.

use super::{
    helpers::{
        calculate_exit_code, close_warning, collect_summary, collect_view_summary,
        create_output_options, resolve_runner_config
    },
    types::{CleanOutput, CleanParams}
};
use crate::{
    config::Config,
    error::AppResult,
    output::format_clean_result,
    runner::run_script
};

/// Executes the cleaning script described by `params` and `config`.
///
/// 1. **Script**: checked and read before anything else; a missing script
///    is fatal and leaves the database untouched
/// 2. **Execution**: statements run one at a time; failures are collected
/// 3. **Summary**: row counts of the summary tables and the first row of
///    the summary view, on the same connection
///
/// # Errors
///
/// Returns an error if the script is missing, unreadable or cannot be
/// tokenized, or if the database cannot be opened. Failed statements are
/// not errors; they are part of [`CleanOutput::execution`].
///
/// # Example
///
/// ```no_run
/// use sql_batch_runner::{
///     app::{CleanParams, run_clean},
///     cli::Format,
///     config::Config
/// };
///
/// let params = CleanParams {
///     database:      None,
///     script:        None,
///     split:         None,
///     summary:       vec![],
///     summary_view:  None,
///     strict:        true,
///     output_format: Format::Text,
///     no_color:      false,
///     verbose:       false
/// };
/// let result = run_clean(params, &Config::default()).unwrap();
/// println!("{}", result.output);
/// ```
pub fn run_clean(params: CleanParams, config: &Config) -> AppResult<CleanOutput> {
    let runner_config = resolve_runner_config(&params, config);
    let (runner, execution) = run_script(&runner_config)?;

    let tables = if params.summary.is_empty() {
        &config.clean.summary_tables
    } else {
        &params.summary
    };
    let summary = collect_summary(runner.connection(), tables);

    let view_name = params
        .summary_view
        .as_deref()
        .unwrap_or(&config.clean.summary_view);
    let view = (!view_name.is_empty()).then(|| collect_view_summary(runner.connection(), view_name));
    let close_error = close_warning(runner.close());

    let opts = create_output_options(params.output_format, params.no_color, params.verbose);
    let output = format_clean_result(&execution, &summary, view.as_ref(), &opts);
    let exit_code = calculate_exit_code(&execution, params.strict);

    Ok(CleanOutput {
        exit_code,
        output,
        execution,
        summary,
        view,
        close_error
    })
}
