use sql_batch_runner::error::{
    config_error, connection_error, file_read_error, file_write_error, missing_script_error,
    query_error, script_parse_error
};

#[test]
fn test_missing_script_error() {
    let error = missing_script_error("sql/clean_data.sql");
    assert!(!error.to_string().is_empty());
}

#[test]
fn test_file_errors() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error = file_read_error("/path/to/file.sql", io_error);
    assert!(!error.to_string().is_empty());

    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error = file_write_error("/out/report.txt", io_error);
    assert!(!error.to_string().is_empty());
}

#[test]
fn test_script_parse_error_with_position() {
    let error = script_parse_error("Unterminated string literal at Line: 5, Column: 10");
    assert!(!error.to_string().is_empty());
}

#[test]
fn test_connection_error() {
    let error = connection_error(
        "/nowhere/loan.db",
        rusqlite::Error::InvalidPath("/nowhere/loan.db".into())
    );
    assert!(!error.to_string().is_empty());
}

#[test]
fn test_error_types_are_different() {
    let query_err = query_error("no such table: loan_cleaned");
    let config_err = config_error("Invalid config file");
    assert!(!query_err.to_string().is_empty());
    assert!(!config_err.to_string().is_empty());
}
