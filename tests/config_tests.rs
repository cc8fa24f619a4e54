use std::fs;

use sql_batch_runner::{
    config::{Config, ExportTarget, ReportSection},
    script::SplitMode
};
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.database.path, "database/loan_data.db");
    assert_eq!(config.clean.script, "sql/clean_data.sql");
    assert_eq!(config.clean.split, SplitMode::Tokenized);
    assert_eq!(config.clean.summary_tables, vec!["loan_raw", "loan_cleaned"]);
    assert_eq!(config.clean.summary_view, "loan_summary");
    assert_eq!(config.report.output_dir, "analysis_results");
    assert_eq!(config.export.output_dir, "powerbi_exports");
}

#[test]
fn test_partial_file_keeps_defaults() {
    let config = Config::from_toml("[clean]\nsplit = \"naive\"\n").unwrap();

    assert_eq!(config.clean.split, SplitMode::Naive);
    assert_eq!(config.clean.script, "sql/clean_data.sql");
    assert_eq!(config.report.sections.len(), 12);
    assert_eq!(config.export.targets.len(), 10);
}

#[test]
fn test_sections_replace_defaults() {
    let config = Config::from_toml(
        r#"
[report]
title = "Q3"

[[report.sections]]
title = "COUNT"
query = "SELECT COUNT(*) FROM loan_cleaned"
"#
    )
    .unwrap();

    assert_eq!(config.report.title, "Q3");
    assert_eq!(config.report.sections, vec![ReportSection::new(
        "COUNT",
        "SELECT COUNT(*) FROM loan_cleaned"
    )]);
    assert_eq!(config.report.output_dir, "analysis_results");
}

#[test]
fn test_export_targets_from_file() {
    let config = Config::from_toml(
        r#"
[export]
output_dir = "out"

[[export.targets]]
name = "risk_segments"
query = "SELECT * FROM risk_segments"
"#
    )
    .unwrap();

    assert_eq!(config.export.output_dir, "out");
    assert_eq!(config.export.targets, vec![ExportTarget::table("risk_segments")]);
}

#[test]
fn test_load_from_explicit_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("runner.toml");
    fs::write(&path, "[database]\npath = \"other.db\"\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    // SQL_BATCH_DATABASE would override; tests do not set it
    if std::env::var_os("SQL_BATCH_DATABASE").is_none() {
        assert_eq!(config.database.path, "other.db");
    }
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
}

#[test]
fn test_invalid_split_value() {
    assert!(Config::from_toml("[clean]\nsplit = \"regex\"\n").is_err());
}

#[test]
fn test_empty_sections_use_defaults() {
    let config = Config::from_toml("[database]\n[clean]\n[report]\n[export]\n").unwrap();

    assert_eq!(config.database.path, "database/loan_data.db");
    assert_eq!(config.clean.script, "sql/clean_data.sql");
    assert_eq!(config.report.sections.len(), 12);
    assert_eq!(config.export.targets.len(), 10);
}
