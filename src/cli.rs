use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// SQL Batch Runner - Clean, analyze and export a SQLite database
#[derive(Parser, Debug)]
#[command(name = "sql-batch-runner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a SQL cleaning script statement by statement
    Clean {
        /// Path to the SQLite database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Path to the SQL script
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Statement splitting strategy
        #[arg(long, value_enum)]
        split: Option<Split>,

        /// Table to count after the run (repeatable)
        #[arg(long = "summary")]
        summary: Vec<String>,

        /// View whose first row is shown after the counts ("" disables it)
        #[arg(long)]
        summary_view: Option<String>,

        /// Exit with status 1 when any statement failed
        #[arg(long)]
        strict: bool,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    },

    /// Run the analysis queries and save a text report
    Report {
        /// Path to the SQLite database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Directory for the report file
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    },

    /// Export tables and views to CSV files
    Export {
        /// Path to the SQLite database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Directory for the CSV files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Split {
    Tokenized,
    Naive
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
