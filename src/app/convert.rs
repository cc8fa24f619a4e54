//! Type conversion functions for CLI to internal types.

use crate::{
    cli::{Format, Split},
    output::OutputFormat,
    script::SplitMode
};

/// Converts a CLI split option to the internal split mode.
///
/// # Example
///
/// ```
/// use sql_batch_runner::{app::convert_split, cli::Split, script::SplitMode};
///
/// assert_eq!(convert_split(Split::Naive), SplitMode::Naive);
/// ```
pub fn convert_split(split: Split) -> SplitMode {
    match split {
        Split::Tokenized => SplitMode::Tokenized,
        Split::Naive => SplitMode::Naive
    }
}

/// Converts a CLI format enum to the internal output format type.
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}
