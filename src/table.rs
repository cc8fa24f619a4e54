//! In-memory result sets fetched from the store.

use std::path::Path;

use rusqlite::{Connection, OpenFlags, types::ValueRef};
use serde::Serialize;

use crate::error::{AppResult, connection_error, query_error};

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>)
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(i) => Self::Integer(i),
            ValueRef::Real(r) => Self::Real(r),
            ValueRef::Text(t) => Self::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Self::Blob(b.to_vec())
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Real(r) => write!(f, "{:?}", r),
            Self::Text(t) => write!(f, "{}", t),
            Self::Blob(b) => {
                write!(f, "x'")?;
                for byte in b {
                    write!(f, "{:02x}", byte)?;
                }
                write!(f, "'")
            }
        }
    }
}

/// Column names plus rows, in query order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows:    Vec<Vec<Value>>
}

impl ResultSet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Open an existing database without write access
///
/// Unlike [`Connection::open`], a wrong path is an error instead of a new
/// empty database.
pub fn open_read_only(path: &Path) -> AppResult<Connection> {
    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| connection_error(&path.display().to_string(), e))
}

/// Run a query and collect every row
pub fn fetch(conn: &Connection, sql: &str) -> AppResult<ResultSet> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| query_error(format!("Failed to prepare query: {}", e)))?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let mut rows = stmt
        .query([])
        .map_err(|e| query_error(format!("Failed to run query: {}", e)))?;
    let mut result = ResultSet {
        columns,
        rows: Vec::new()
    };
    while let Some(row) = rows
        .next()
        .map_err(|e| query_error(format!("Failed to read row: {}", e)))?
    {
        let mut values = Vec::with_capacity(width);
        for i in 0..width {
            let value = row
                .get_ref(i)
                .map_err(|e| query_error(format!("Failed to read column {}: {}", i, e)))?;
            values.push(Value::from(value));
        }
        result.rows.push(values);
    }
    Ok(result)
}

/// Count rows of a table or view
pub fn count_rows(conn: &Connection, table: &str) -> AppResult<u64> {
    let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
    conn.query_row(&sql, [], |row| row.get::<_, i64>(0))
        .map(|n| n.max(0) as u64)
        .map_err(|e| query_error(format!("Failed to count rows of '{}': {}", table, e)))
}

/// Whether a table or view with this name exists, in `main` or `temp`
pub fn table_exists(conn: &Connection, name: &str) -> AppResult<bool> {
    conn.query_row(
        "SELECT EXISTS (
             SELECT 1 FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE
             UNION ALL
             SELECT 1 FROM sqlite_temp_master WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE
         )",
        [name],
        |row| row.get::<_, bool>(0)
    )
    .map_err(|e| query_error(format!("Failed to look up '{}': {}", name, e)))
}

/// Quote an identifier for SQLite
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER, name TEXT, score REAL, raw BLOB);
             INSERT INTO t VALUES (1, 'a', 1.5, x'0aff'), (2, NULL, 2.0, NULL);"
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_fetch_columns_and_rows() {
        let rs = fetch(&conn(), "SELECT id, name, score, raw FROM t ORDER BY id").unwrap();
        assert_eq!(rs.columns, vec!["id", "name", "score", "raw"]);
        assert_eq!(rs.row_count(), 2);
        assert_eq!(rs.rows[0][0], Value::Integer(1));
        assert_eq!(rs.rows[0][3], Value::Blob(vec![0x0a, 0xff]));
        assert_eq!(rs.rows[1][1], Value::Null);
    }

    #[test]
    fn test_fetch_invalid_query() {
        assert!(fetch(&conn(), "SELECT nope FROM t").is_err());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Integer(7).to_string(), "7");
        assert_eq!(Value::Real(2.0).to_string(), "2.0");
        assert_eq!(Value::Real(5403.46).to_string(), "5403.46");
        assert_eq!(Value::Blob(vec![1, 171]).to_string(), "x'01ab'");
    }

    #[test]
    fn test_count_rows() {
        let conn = conn();
        assert_eq!(count_rows(&conn, "t").unwrap(), 2);
        assert!(count_rows(&conn, "missing").is_err());
    }

    #[test]
    fn test_table_exists() {
        let conn = conn();
        conn.execute_batch("CREATE VIEW v AS SELECT id FROM t; CREATE TEMP TABLE scratch (a)")
            .unwrap();
        assert!(table_exists(&conn, "t").unwrap());
        assert!(table_exists(&conn, "V").unwrap());
        assert!(table_exists(&conn, "scratch").unwrap());
        assert!(!table_exists(&conn, "missing").unwrap());
    }

    #[test]
    fn test_open_read_only_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        assert!(open_read_only(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("loan_raw"), "\"loan_raw\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
