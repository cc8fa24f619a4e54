//! Statement boundary detection for SQL scripts.
//!
//! A script is cut into an ordered batch of [`Candidate`]s. Every piece
//! between delimiters gets an ordinal, including the ones that end up
//! skipped, so failures can be traced back to their position in the file.
//!
//! Two strategies are available through [`SplitMode`]:
//!
//! - [`SplitMode::Tokenized`] runs the `sqlparser` tokenizer with the SQLite
//!   dialect and only splits on semicolons that are real delimiters. String
//!   literals, quoted identifiers, comments and `CREATE TRIGGER` bodies are
//!   kept intact, and a piece made of comments alone is skipped.
//! - [`SplitMode::Naive`] splits on every `;`, trims each piece and skips
//!   empty pieces and pieces starting with `--`. A piece that starts with a
//!   comment line followed by SQL is skipped as a whole.

mod types;

use sqlparser::{
    dialect::SQLiteDialect,
    keywords::Keyword,
    tokenizer::{Location, Token, TokenWithSpan, Tokenizer, Whitespace}
};
pub use types::{Candidate, SkipReason, SplitMode, Statement, StatementKind};

use crate::error::{AppResult, script_parse_error};

/// Split a script into candidates using the given mode
pub fn split_script(sql: &str, mode: SplitMode) -> AppResult<Vec<Candidate>> {
    match mode {
        SplitMode::Tokenized => split_tokenized(sql),
        SplitMode::Naive => Ok(split_naive(sql))
    }
}

/// Split on every `;` without looking at the SQL
pub fn split_naive(sql: &str) -> Vec<Candidate> {
    sql.split(';')
        .enumerate()
        .map(|(i, piece)| {
            let ordinal = i + 1;
            let trimmed = piece.trim();
            if trimmed.is_empty() {
                Candidate::Skipped {
                    ordinal,
                    reason: SkipReason::Empty
                }
            } else if trimmed.starts_with("--") {
                Candidate::Skipped {
                    ordinal,
                    reason: SkipReason::Comment
                }
            } else {
                Candidate::Executable(Statement::new(ordinal, trimmed))
            }
        })
        .collect()
}

/// Split on delimiter tokens only
///
/// Statement text is cut from `sql` between delimiter positions, so the
/// database receives exactly what was written.
///
/// # Errors
///
/// Fails when the script cannot be tokenized, e.g. an unterminated string
/// literal or block comment.
pub fn split_tokenized(sql: &str) -> AppResult<Vec<Candidate>> {
    let dialect = SQLiteDialect {};
    let tokens = Tokenizer::new(&dialect, sql)
        .tokenize_with_location()
        .map_err(|e| script_parse_error(e.to_string()))?;

    let lines = LineIndex::new(sql);
    let mut candidates = Vec::new();
    let mut chunk = Chunk::default();
    let mut start = 0;
    for TokenWithSpan {
        token,
        span
    } in tokens
    {
        match token {
            Token::EOF => {}
            Token::SemiColon if !chunk.in_block() => {
                let end = lines.offset(sql, span.start).max(start);
                let finished = std::mem::take(&mut chunk);
                candidates.push(finished.finish(candidates.len() + 1, &sql[start..end]));
                start = (end + 1).min(sql.len());
            }
            other => chunk.push(&other)
        }
    }
    candidates.push(chunk.finish(candidates.len() + 1, &sql[start..]));
    Ok(candidates)
}

/// Byte offsets of line starts, for turning token locations into slices
struct LineIndex {
    starts: Vec<usize>
}

impl LineIndex {
    fn new(sql: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(sql.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            starts
        }
    }

    /// Byte offset of a 1-based line/column location
    fn offset(&self, sql: &str, location: Location) -> usize {
        let line = (location.line as usize).saturating_sub(1);
        let Some(&line_start) = self.starts.get(line) else {
            return sql.len();
        };
        let column = (location.column as usize).saturating_sub(1);
        sql[line_start..]
            .char_indices()
            .nth(column)
            .map(|(i, _)| line_start + i)
            .unwrap_or(sql.len())
    }
}

/// Token facts collected between two delimiters
#[derive(Default)]
struct Chunk {
    has_code:    bool,
    has_comment: bool,
    leading:     Vec<Keyword>,
    depth:       usize
}

impl Chunk {
    fn push(&mut self, token: &Token) {
        match token {
            Token::Whitespace(
                Whitespace::SingleLineComment {
                    ..
                }
                | Whitespace::MultiLineComment(_)
            ) => self.has_comment = true,
            Token::Whitespace(_) => {}
            Token::Word(word) => {
                self.has_code = true;
                if self.leading.len() < 3 {
                    self.leading.push(word.keyword);
                }
                if self.is_trigger() {
                    match word.keyword {
                        Keyword::BEGIN | Keyword::CASE => self.depth += 1,
                        Keyword::END => self.depth = self.depth.saturating_sub(1),
                        _ => {}
                    }
                }
            }
            _ => self.has_code = true
        }
    }

    fn is_trigger(&self) -> bool {
        match self.leading.as_slice() {
            [Keyword::CREATE, Keyword::TRIGGER, ..] => true,
            [Keyword::CREATE, Keyword::TEMP | Keyword::TEMPORARY, Keyword::TRIGGER] => true,
            _ => false
        }
    }

    /// Inside a trigger body, where `;` ends inner statements only
    fn in_block(&self) -> bool {
        self.depth > 0 && self.is_trigger()
    }

    fn finish(self, ordinal: usize, text: &str) -> Candidate {
        if self.has_code {
            Candidate::Executable(Statement::new(ordinal, text.trim()))
        } else if self.has_comment {
            Candidate::Skipped {
                ordinal,
                reason: SkipReason::Comment
            }
        } else {
            Candidate::Skipped {
                ordinal,
                reason: SkipReason::Empty
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executable(candidates: &[Candidate]) -> Vec<&str> {
        candidates
            .iter()
            .filter_map(Candidate::statement)
            .map(|s| s.sql.as_str())
            .collect()
    }

    #[test]
    fn test_naive_comment_defect_is_reproduced() {
        let sql = "CREATE TABLE t (a int); -- comment\nINSERT INTO t VALUES (1);";
        let candidates = split_naive(sql);
        assert_eq!(candidates.len(), 3);
        assert!(matches!(
            candidates[1],
            Candidate::Skipped {
                ordinal: 2,
                reason:  SkipReason::Comment
            }
        ));
        assert!(matches!(
            candidates[2],
            Candidate::Skipped {
                ordinal: 3,
                reason:  SkipReason::Empty
            }
        ));
        assert_eq!(executable(&candidates), vec!["CREATE TABLE t (a int)"]);
    }

    #[test]
    fn test_tokenized_keeps_statement_after_comment() {
        let sql = "CREATE TABLE t (a int); -- comment\nINSERT INTO t VALUES (1);";
        let candidates = split_tokenized(sql).unwrap();
        assert_eq!(candidates.len(), 3);
        let stmts = executable(&candidates);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0], "CREATE TABLE t (a int)");
        assert!(stmts[1].ends_with("INSERT INTO t VALUES (1)"));
        assert_eq!(candidates[1].statement().unwrap().kind, StatementKind::Insert);
    }

    #[test]
    fn test_tokenized_semicolon_in_literal() {
        let sql = "INSERT INTO t VALUES ('a;b'); INSERT INTO t VALUES ('it''s;')";
        let candidates = split_tokenized(sql).unwrap();
        let stmts = executable(&candidates);
        assert_eq!(
            stmts,
            vec!["INSERT INTO t VALUES ('a;b')", "INSERT INTO t VALUES ('it''s;')"]
        );
    }

    #[test]
    fn test_tokenized_semicolon_in_comment_and_identifier() {
        let sql = "SELECT \"x;y\" FROM t /* a; b */; SELECT 2";
        let candidates = split_tokenized(sql).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(executable(&candidates)[0], "SELECT \"x;y\" FROM t /* a; b */");
    }

    #[test]
    fn test_tokenized_comment_only_pieces_are_skipped() {
        let sql = "-- header\n\n/* block */;\n  ;\n-- trailer\n";
        let candidates = split_tokenized(sql).unwrap();
        assert_eq!(candidates.len(), 3);
        assert!(executable(&candidates).is_empty());
        assert!(matches!(
            candidates[0],
            Candidate::Skipped {
                reason: SkipReason::Comment,
                ..
            }
        ));
        assert!(matches!(
            candidates[1],
            Candidate::Skipped {
                reason: SkipReason::Empty,
                ..
            }
        ));
    }

    #[test]
    fn test_tokenized_trigger_body_is_one_statement() {
        let sql = "CREATE TRIGGER trg AFTER INSERT ON t BEGIN \
                   UPDATE t SET a = CASE WHEN a > 0 THEN a ELSE 0 END; \
                   INSERT INTO log VALUES (1); \
                   END; SELECT 1";
        let candidates = split_tokenized(sql).unwrap();
        let stmts = executable(&candidates);
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].starts_with("CREATE TRIGGER"));
        assert!(stmts[0].ends_with("END"));
        assert_eq!(stmts[1], "SELECT 1");
    }

    #[test]
    fn test_tokenized_transaction_begin_still_splits() {
        let candidates = split_tokenized("BEGIN; INSERT INTO t VALUES (1); COMMIT;").unwrap();
        assert_eq!(executable(&candidates), vec![
            "BEGIN",
            "INSERT INTO t VALUES (1)",
            "COMMIT"
        ]);
    }

    #[test]
    fn test_tokenized_unterminated_literal_fails() {
        assert!(split_tokenized("SELECT 'oops").is_err());
    }

    #[test]
    fn test_ordinals_count_skipped_pieces() {
        let sql = ";;SELECT 1";
        for mode in [SplitMode::Naive, SplitMode::Tokenized] {
            let candidates = split_script(sql, mode).unwrap();
            assert_eq!(candidates.len(), 3);
            assert_eq!(candidates[2].statement().unwrap().ordinal, 3);
        }
    }

    #[test]
    fn test_empty_script() {
        assert_eq!(split_naive("").len(), 1);
        assert_eq!(split_tokenized("").unwrap().len(), 1);
        assert!(executable(&split_tokenized("   \n").unwrap()).is_empty());
    }

    #[test]
    fn test_tokenized_keeps_original_text() {
        let sql = "INSERT INTO t VALUES (0x10, x'0aff', 1e3);\r\n\
                   SELECT [bracket id], \"a\"\"b\" FROM t WHERE a = ?1 OR b = :name OR c = $v;\n\
                   UPDATE t SET note = 'café; crème' WHERE id = 0X1f";
        let candidates = split_tokenized(sql).unwrap();
        assert_eq!(executable(&candidates), vec![
            "INSERT INTO t VALUES (0x10, x'0aff', 1e3)",
            "SELECT [bracket id], \"a\"\"b\" FROM t WHERE a = ?1 OR b = :name OR c = $v",
            "UPDATE t SET note = 'café; crème' WHERE id = 0X1f"
        ]);
    }

    #[test]
    fn test_line_index_offsets() {
        let sql = "é;\nab;";
        let index = LineIndex::new(sql);
        let at = |line, column| index.offset(sql, Location {
            line,
            column
        });
        assert_eq!(at(1, 2), 2);
        assert_eq!(at(2, 3), 6);
        assert_eq!(at(9, 1), sql.len());
    }
}
