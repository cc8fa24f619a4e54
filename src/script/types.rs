use serde::{Deserialize, Serialize};

/// How a script is cut into statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Token-aware splitting: semicolons inside literals, quoted identifiers,
    /// comments and trigger bodies do not end a statement.
    #[default]
    Tokenized,
    /// Split on every `;` and skip pieces starting with `--`.
    Naive
}

impl std::fmt::Display for SplitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tokenized => write!(f, "tokenized"),
            Self::Naive => write!(f, "naive")
        }
    }
}

/// A single statement ready for execution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    /// 1-based position among all candidates of the script
    pub ordinal: usize,
    pub sql:     String,
    pub kind:    StatementKind
}

impl Statement {
    pub fn new(ordinal: usize, sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let kind = StatementKind::detect(&sql);
        Self { ordinal, sql, kind }
    }
}

/// Why a candidate was not executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    Empty,
    Comment
}

/// One piece of a script between delimiters
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    Executable(Statement),
    Skipped { ordinal: usize, reason: SkipReason }
}

impl Candidate {
    pub fn ordinal(&self) -> usize {
        match self {
            Self::Executable(stmt) => stmt.ordinal,
            Self::Skipped { ordinal, .. } => *ordinal
        }
    }

    pub fn statement(&self) -> Option<&Statement> {
        match self {
            Self::Executable(stmt) => Some(stmt),
            Self::Skipped { .. } => None
        }
    }
}

/// Leading keyword of a statement, used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub enum StatementKind {
    Create,
    Drop,
    Alter,
    Insert,
    Update,
    Delete,
    Select,
    Pragma,
    Transaction,
    Other
}

impl StatementKind {
    /// Classify by the first keyword after any leading comments
    pub fn detect(sql: &str) -> Self {
        let keyword: String = strip_leading_comments(sql)
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_uppercase();
        match keyword.as_str() {
            "CREATE" => Self::Create,
            "DROP" => Self::Drop,
            "ALTER" => Self::Alter,
            "INSERT" | "REPLACE" => Self::Insert,
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            "SELECT" | "WITH" | "VALUES" => Self::Select,
            "PRAGMA" => Self::Pragma,
            "BEGIN" | "COMMIT" | "END" | "ROLLBACK" | "SAVEPOINT" | "RELEASE" => Self::Transaction,
            _ => Self::Other
        }
    }

    /// Whether the store reports a meaningful change count for this kind
    pub fn is_dml(self) -> bool {
        matches!(self, Self::Insert | Self::Update | Self::Delete)
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::Drop => write!(f, "DROP"),
            Self::Alter => write!(f, "ALTER"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Select => write!(f, "SELECT"),
            Self::Pragma => write!(f, "PRAGMA"),
            Self::Transaction => write!(f, "TRANSACTION"),
            Self::Other => write!(f, "OTHER")
        }
    }
}

fn strip_leading_comments(mut sql: &str) -> &str {
    loop {
        sql = sql.trim_start();
        if let Some(rest) = sql.strip_prefix("--") {
            sql = rest.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(rest) = sql.strip_prefix("/*") {
            sql = rest.split_once("*/").map_or("", |(_, tail)| tail);
        } else {
            return sql;
        }
    }
}
