use std::process;

use clap::Parser;
use sql_batch_runner::{
    app::{CleanParams, ExportParams, ReportParams, run_clean, run_export, run_report},
    cli::{Cli, Commands, Format},
    config::Config,
    error::AppResult
};
use tracing_subscriber::{
    EnvFilter, fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt
};

fn main() {
    let cli = Cli::parse();
    // Keep machine-readable stdout clean
    let structured_output = matches!(
        cli.command,
        Commands::Clean {
            output_format: Format::Json | Format::Yaml,
            ..
        }
    );
    init_tracing(cli.verbose, structured_output);

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: u8, logs_to_stderr: bool) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let writer = if logs_to_stderr {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        BoxMakeWriter::new(std::io::stdout)
    };
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false)
                .with_writer(writer)
        )
        .init();
}

fn run(cli: Cli) -> AppResult<i32> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Clean {
            database,
            script,
            split,
            summary,
            summary_view,
            strict,
            output_format,
            no_color
        } => {
            let params = CleanParams {
                database,
                script,
                split,
                summary,
                summary_view,
                strict,
                output_format,
                no_color,
                verbose: cli.verbose > 0
            };
            let result = run_clean(params, &config)?;
            println!("{}", result.output);
            Ok(result.exit_code)
        }
        Commands::Report {
            database,
            output_dir,
            no_color
        } => {
            let params = ReportParams {
                database,
                output_dir,
                no_color
            };
            let result = run_report(params, &config)?;
            println!("{}", result.output);
            Ok(result.exit_code)
        }
        Commands::Export {
            database,
            output_dir,
            no_color
        } => {
            let params = ExportParams {
                database,
                output_dir,
                no_color
            };
            let result = run_export(params, &config)?;
            println!("{}", result.output);
            Ok(result.exit_code)
        }
    }
}
