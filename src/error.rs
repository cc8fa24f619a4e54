pub use masterror::{AppError, AppResult};

/// Create error for a script file that does not exist
pub fn missing_script_error(path: &str) -> AppError {
    AppError::not_found(format!("SQL script not found: '{}'", path))
}

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create file write error
pub fn file_write_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to write '{}': {}", path, source))
}

/// Create script tokenization error with optional position info
pub fn script_parse_error(message: impl Into<String>) -> AppError {
    let msg = message.into();
    AppError::bad_request(format_sql_error("Script parse error", &msg))
}

/// Create database connection error
pub fn connection_error(path: &str, source: rusqlite::Error) -> AppError {
    AppError::service(format!("Failed to open database '{}': {}", path, source))
}

/// Create query execution error
pub fn query_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Format SQL error with position highlighting
fn format_sql_error(prefix: &str, message: &str) -> String {
    // sqlparser reports "... at Line: X, Column: Y" (older releases omit the
    // second colon)
    if let Some(pos) = extract_position(message) {
        format!(
            "{} at line {}, column {}:\n  {}",
            prefix, pos.line, pos.column, message
        )
    } else {
        format!("{}:\n  {}", prefix, message)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct SqlPosition {
    line:   usize,
    column: usize
}

fn extract_position(message: &str) -> Option<SqlPosition> {
    let line_marker = "Line: ";
    let col_marker = ", Column";

    let line_start = message.find(line_marker)? + line_marker.len();
    let col_offset = message[line_start..].find(col_marker)?;
    let line_str = &message[line_start..line_start + col_offset];

    let rest = &message[line_start + col_offset + col_marker.len()..];
    let rest = rest.trim_start_matches(':').trim_start();
    let col_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    let line = line_str.trim().parse().ok()?;
    let column = rest[..col_end].parse().ok()?;
    Some(SqlPosition { line, column })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_position_with_colon() {
        let pos = extract_position("Unterminated string literal at Line: 3, Column: 14");
        assert_eq!(pos, Some(SqlPosition { line: 3, column: 14 }));
    }

    #[test]
    fn test_extract_position_without_colon() {
        let pos = extract_position("Expected end at Line: 12, Column 7 near x");
        assert_eq!(pos, Some(SqlPosition { line: 12, column: 7 }));
    }

    #[test]
    fn test_extract_position_missing() {
        assert_eq!(extract_position("no position here"), None);
        assert_eq!(extract_position("Line: abc, Column: 1"), None);
    }

    #[test]
    fn test_format_sql_error_with_position() {
        let msg = format_sql_error("Script parse error", "bad at Line: 1, Column: 2");
        assert!(msg.starts_with("Script parse error at line 1, column 2:"));
    }

    #[test]
    fn test_format_sql_error_without_position() {
        let msg = format_sql_error("Script parse error", "bad");
        assert_eq!(msg, "Script parse error:\n  bad");
    }
}
