//! Configuration loading and management.
//!
//! Configuration is assembled from the following sources (highest to lowest
//! precedence):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. The TOML file passed with `--config`
//! 4. Default values
//!
//! No file is picked up implicitly: without `--config` only defaults and the
//! environment apply.
//!
//! # Configuration File Format
//!
//! ```toml
//! [database]
//! path = "database/loan_data.db"
//!
//! [clean]
//! script = "sql/clean_data.sql"
//! split = "tokenized"              # tokenized, naive
//! summary_tables = ["loan_raw", "loan_cleaned"]
//!
//! [report]
//! output_dir = "analysis_results"
//! title = "LOAN ELIGIBILITY STATISTICAL ANALYSIS"
//!
//! [[report.sections]]
//! title = "GENDER DISTRIBUTION"
//! query = "SELECT * FROM demographics_by_gender"
//!
//! [export]
//! output_dir = "powerbi_exports"
//!
//! [[export.targets]]
//! name = "loan_cleaned"
//! query = "SELECT * FROM loan_cleaned"
//! ```
//!
//! Listing `sections` or `targets` replaces the built-in list.
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SQL_BATCH_DATABASE` | Database file path |
//! | `SQL_BATCH_SCRIPT` | Cleaning script path |

use std::{env, fs, path::Path};

use serde::Deserialize;

use crate::{
    error::{AppResult, config_error},
    script::SplitMode
};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub clean:    CleanConfig,
    #[serde(default)]
    pub report:   ReportConfig,
    #[serde(default)]
    pub export:   ExportConfig
}

/// Database location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: String::from("database/loan_data.db")
        }
    }
}

/// Cleaning script settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    pub script:         String,
    pub split:          SplitMode,
    /// Tables whose row counts are shown after the run
    pub summary_tables: Vec<String>,
    /// View whose first row is shown after the counts; empty disables it
    pub summary_view:   String
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            script:         String::from("sql/clean_data.sql"),
            split:          SplitMode::Tokenized,
            summary_tables: vec![String::from("loan_raw"), String::from("loan_cleaned")],
            summary_view:   String::from("loan_summary")
        }
    }
}

/// One titled query of the analysis report
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReportSection {
    pub title: String,
    pub query: String
}

impl ReportSection {
    pub fn new(title: &str, query: &str) -> Self {
        Self {
            title: title.to_string(),
            query: query.to_string()
        }
    }
}

/// Analysis report settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_dir: String,
    pub title:      String,
    pub sections:   Vec<ReportSection>
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: String::from("analysis_results"),
            title:      String::from("LOAN ELIGIBILITY STATISTICAL ANALYSIS"),
            sections:   default_report_sections()
        }
    }
}

/// One CSV file of the export
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ExportTarget {
    /// File stem of the CSV
    pub name:  String,
    pub query: String
}

impl ExportTarget {
    /// Export a whole table or view under its own name
    pub fn table(name: &str) -> Self {
        Self {
            name:  name.to_string(),
            query: format!("SELECT * FROM {}", name)
        }
    }
}

/// CSV export settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: String,
    pub targets:    Vec<ExportTarget>
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: String::from("powerbi_exports"),
            targets:    default_export_targets()
        }
    }
}

const RISK_DISTRIBUTION_QUERY: &str = "SELECT
    Risk_Category,
    COUNT(*) AS Count,
    ROUND(COUNT(*) * 100.0 / (SELECT COUNT(*) FROM risk_segments), 2) AS Percentage
FROM risk_segments
GROUP BY Risk_Category
ORDER BY Count DESC";

fn default_report_sections() -> Vec<ReportSection> {
    vec![
        ReportSection::new(
            "OVERALL STATISTICS",
            "SELECT
    COUNT(*) AS Total_Applications,
    ROUND(AVG(TotalIncome), 2) AS Avg_Total_Income,
    ROUND(AVG(LoanAmount), 2) AS Avg_Loan_Amount,
    ROUND(AVG(Loan_to_Income_Ratio), 2) AS Avg_LTI_Ratio,
    ROUND(SUM(CASE WHEN Credit_History = 1 THEN 1 ELSE 0 END) * 100.0 / COUNT(*), 2) AS Pct_Good_Credit
FROM loan_cleaned"
        ),
        ReportSection::new("GENDER DISTRIBUTION", "SELECT * FROM demographics_by_gender"),
        ReportSection::new("EDUCATION ANALYSIS", "SELECT * FROM demographics_by_education"),
        ReportSection::new(
            "PROPERTY AREA DISTRIBUTION",
            "SELECT * FROM demographics_by_property"
        ),
        ReportSection::new("INCOME CATEGORIES", "SELECT * FROM analysis_by_income"),
        ReportSection::new("CREDIT HISTORY IMPACT", "SELECT * FROM analysis_by_credit"),
        ReportSection::new(
            "MARITAL STATUS ANALYSIS",
            "SELECT * FROM analysis_by_marital_status"
        ),
        ReportSection::new("EMPLOYMENT STATUS", "SELECT * FROM analysis_by_employment"),
        ReportSection::new("DEPENDENTS ANALYSIS", "SELECT * FROM analysis_by_dependents"),
        ReportSection::new("RISK DISTRIBUTION", RISK_DISTRIBUTION_QUERY),
        ReportSection::new(
            "TOP 10 HIGHEST INCOME APPLICANTS",
            "SELECT Loan_ID, Gender, Education, TotalIncome, LoanAmount,
       Loan_to_Income_Ratio, Credit_Category
FROM loan_cleaned
ORDER BY TotalIncome DESC
LIMIT 10"
        ),
        ReportSection::new(
            "TOP 10 LARGEST LOAN REQUESTS",
            "SELECT Loan_ID, Gender, Education, TotalIncome, LoanAmount,
       Loan_to_Income_Ratio, Credit_Category
FROM loan_cleaned
ORDER BY LoanAmount DESC
LIMIT 10"
        )
    ]
}

fn default_export_targets() -> Vec<ExportTarget> {
    let mut targets: Vec<ExportTarget> = [
        "loan_cleaned",
        "demographics_by_gender",
        "demographics_by_education",
        "demographics_by_property",
        "analysis_by_income",
        "analysis_by_credit",
        "analysis_by_marital_status",
        "analysis_by_employment",
        "risk_segments"
    ]
    .into_iter()
    .map(ExportTarget::table)
    .collect();
    targets.push(ExportTarget {
        name:  String::from("risk_distribution"),
        query: String::from(
            "SELECT
    Risk_Category,
    COUNT(*) AS Count,
    ROUND(COUNT(*) * 100.0 / (SELECT COUNT(*) FROM risk_segments), 2) AS Percentage,
    ROUND(AVG(TotalIncome), 2) AS Avg_Income,
    ROUND(AVG(LoanAmount), 2) AS Avg_Loan,
    ROUND(AVG(Loan_to_Income_Ratio), 2) AS Avg_LTI
FROM risk_segments
GROUP BY Risk_Category"
        )
    });
    targets
}

impl Config {
    /// Load configuration from an optional file and the environment
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    config_error(format!(
                        "Failed to read config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                Self::from_toml(&content)?
            }
            None => Self::default()
        };

        if let Ok(database) = env::var("SQL_BATCH_DATABASE") {
            config.database.path = database;
        }

        if let Ok(script) = env::var("SQL_BATCH_SCRIPT") {
            config.clean.script = script;
        }

        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }
}
