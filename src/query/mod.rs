//! Query parsing and execution.
//!
//! A raw query string passes through the tokenizer into a [`TokenQueue`],
//! then through the grammar parsers in strict order (export clause,
//! initials, projections, path, conditions), each consuming its clause
//! from the front of the shared queue. The result is an immutable
//! [`ParsedQuery`] which [`execute`] runs against the filesystem.

pub mod conditions;
pub mod fields;
pub mod initials;
pub mod operators;
pub mod paths;
pub mod projections;
pub mod tokens;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::entities::provider::ReadError;
use crate::entities::{EntityKind, ReadMode, Session};
use crate::output::Table;

use conditions::ConditionExpr;
use initials::{ExportTarget, OperationKind};
use operators::{DataQueryOperator, DeleteOutcome, DirQueryOperator, FileQueryOperator};
use paths::QueryPath;
use projections::Projection;
use tokens::TokenQueue;

/// Fatal query-text errors. Nothing has been touched on disk when one
/// of these is raised.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unbalanced closing delimiter '{0}'")]
    UnbalancedDelimiter(char),

    #[error("unterminated delimiter; expected closing '{0}'")]
    UnterminatedDelimiter(char),

    #[error("unexpected end of query")]
    UnexpectedEnd,

    #[error("invalid query syntax: {0}")]
    InvalidSyntax(String),

    #[error("unknown operation '{0}'")]
    InvalidOperation(String),

    #[error("unknown condition operator '{0}'")]
    InvalidOperator(String),

    #[error("unknown field '{0}'")]
    InvalidField(String),

    #[error("unknown size unit '{0}'")]
    InvalidSizeUnit(String),

    #[error("invalid date literal '{0}'")]
    InvalidDate(String),

    #[error("invalid pattern '{0}'")]
    InvalidPattern(String),

    #[error("'between' requires exactly two elements, found {0}")]
    BetweenArity(usize),

    #[error("invalid operation parameter '{0}'")]
    InvalidParameter(String),

    #[error("cannot export the results of a delete operation")]
    ExportWithDelete,

    #[error("export target '{0}' already exists")]
    ExportTargetExists(PathBuf),

    #[error("export target '{0}' sits in a nonexistent directory")]
    ExportParentMissing(PathBuf),

    #[error("unsupported export format for '{0}'; use a .csv or .json target")]
    UnsupportedExportFormat(String),

    #[error("expected '{expected}', found '{found}'")]
    ExpectedKeyword {
        expected: &'static str,
        found: String,
    },

    #[error("'{path}' is not an accessible {expected}")]
    PathKindMismatch {
        path: PathBuf,
        expected: &'static str,
    },

    #[error("cannot resolve path '{0}'")]
    UnresolvablePath(PathBuf),

    #[error("unexpected trailing tokens starting at '{0}'")]
    TrailingTokens(String),
}

/// Errors raised while an operation is running. These abort the
/// operation in progress with context attached.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("cannot compare {left} {operator} {right}")]
    Incomparable {
        operator: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("malformed condition: {0}")]
    Condition(String),

    #[error("failed to remove '{path}': {source}")]
    Removal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0} is not supported")]
    Unsupported(&'static str),

    #[error(transparent)]
    Read(#[from] ReadError),
}

/// A parsed search operation.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub path: QueryPath,
    pub entity: EntityKind,
    pub recursive: bool,
    pub read_mode: ReadMode,
    pub projections: Vec<Projection>,
    pub condition: ConditionExpr,
    pub export: Option<ExportTarget>,
}

/// A parsed delete operation.
#[derive(Debug, Clone)]
pub struct DeleteQuery {
    pub path: QueryPath,
    pub entity: EntityKind,
    pub recursive: bool,
    pub skip_err: bool,
    pub condition: ConditionExpr,
}

/// A fully parsed, validated query ready for execution.
#[derive(Debug, Clone)]
pub enum ParsedQuery {
    Search(SearchQuery),
    Delete(DeleteQuery),
}

/// Result of executing a query.
#[derive(Debug)]
pub enum QueryOutput {
    Table(Table),
    Deleted(DeleteOutcome),
}

/// Parses a raw query string into a [`ParsedQuery`].
///
/// # Errors
/// Fails on any grammar, field, path or export violation; see
/// [`ParseError`].
pub fn parse(raw: &str) -> Result<ParsedQuery, ParseError> {
    let mut queue = TokenQueue::from_query(raw)?;

    let export = initials::parse_export(&mut queue)?;
    let initials = initials::parse_initials(&mut queue, export.is_some())?;

    match initials.operation {
        OperationKind::Search => {
            let projections = projections::parse_projections(&mut queue, initials.entity)?;
            let path = paths::parse_path(&mut queue, initials.entity)?;
            let condition = parse_condition_clause(&mut queue, initials.entity)?;
            Ok(ParsedQuery::Search(SearchQuery {
                path,
                entity: initials.entity,
                recursive: initials.recursive,
                read_mode: initials.read_mode,
                projections,
                condition,
                export,
            }))
        }
        OperationKind::Delete => {
            // Data lines live inside files; only files and directories
            // can be removed.
            if initials.entity == EntityKind::Data {
                return Err(ParseError::InvalidParameter("type data".into()));
            }
            let path = paths::parse_path(&mut queue, initials.entity)?;
            let condition = parse_condition_clause(&mut queue, initials.entity)?;
            Ok(ParsedQuery::Delete(DeleteQuery {
                path,
                entity: initials.entity,
                recursive: initials.recursive,
                skip_err: initials.skip_err,
                condition,
            }))
        }
    }
}

fn parse_condition_clause(
    queue: &mut TokenQueue,
    entity: EntityKind,
) -> Result<ConditionExpr, ParseError> {
    match queue.peek() {
        None => Ok(ConditionExpr::always_true()),
        Some(front) if front.eq_ignore_ascii_case("where") => {
            queue.pop()?;
            let tokens = queue.drain();
            conditions::parse_expression(&tokens, entity)
        }
        Some(other) => Err(ParseError::TrailingTokens(other.to_string())),
    }
}

/// Runs a parsed query against the filesystem.
///
/// # Errors
/// Fails when the operation itself fails; see [`OperationError`].
pub fn execute(query: &ParsedQuery) -> Result<QueryOutput, OperationError> {
    let mut session = Session::new();

    match query {
        ParsedQuery::Search(search) => {
            let root = search.path.path.as_path();
            let table = match search.entity {
                EntityKind::File => FileQueryOperator::new(root, search.recursive).search(
                    &search.projections,
                    &search.condition,
                    &mut session,
                )?,
                EntityKind::Dir => DirQueryOperator::new(root, search.recursive).search(
                    &search.projections,
                    &search.condition,
                    &mut session,
                )?,
                EntityKind::Data => {
                    DataQueryOperator::new(root, search.recursive, search.read_mode).search(
                        &search.projections,
                        &search.condition,
                        &mut session,
                    )?
                }
            };
            Ok(QueryOutput::Table(table))
        }
        ParsedQuery::Delete(delete) => {
            let root = delete.path.path.as_path();
            let outcome = match delete.entity {
                EntityKind::File => FileQueryOperator::new(root, delete.recursive).delete(
                    &delete.condition,
                    delete.skip_err,
                    &mut session,
                )?,
                EntityKind::Dir => DirQueryOperator::new(root, delete.recursive).delete(
                    &delete.condition,
                    delete.skip_err,
                    &mut session,
                )?,
                EntityKind::Data => {
                    return Err(OperationError::Unsupported("deleting data lines"))
                }
            };
            Ok(QueryOutput::Deleted(outcome))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_defaults() {
        let parsed = parse("select name from '.'").unwrap();
        let ParsedQuery::Search(search) = parsed else {
            panic!("expected a search query");
        };
        assert_eq!(search.entity, EntityKind::File);
        assert!(!search.recursive);
        assert!(search.condition.is_empty());
        assert!(search.export.is_none());
        assert_eq!(search.projections.len(), 1);
    }

    #[test]
    fn test_parse_full_search() {
        let parsed = parse(
            "r select[type data, mode bytes] lineno, dataline from '.' where dataline like 'x.*'",
        )
        .unwrap();
        let ParsedQuery::Search(search) = parsed else {
            panic!("expected a search query");
        };
        assert_eq!(search.entity, EntityKind::Data);
        assert_eq!(search.read_mode, ReadMode::Bytes);
        assert!(search.recursive);
        assert!(!search.condition.is_empty());
    }

    #[test]
    fn test_parse_delete() {
        let parsed = parse("delete[type file, skip_err true] from '.' where name = 'x'").unwrap();
        let ParsedQuery::Delete(delete) = parsed else {
            panic!("expected a delete query");
        };
        assert_eq!(delete.entity, EntityKind::File);
        assert!(delete.skip_err);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert!(parse("SELECT Name FROM '.' WHERE name != 'x'").is_ok());
    }

    #[test]
    fn test_delete_of_data_lines_is_rejected() {
        let err = parse("delete[type data] from '.'").unwrap_err();
        assert!(matches!(err, ParseError::InvalidParameter(_)));
    }

    #[test]
    fn test_trailing_tokens_are_fatal() {
        let err = parse("select name from '.' garbage").unwrap_err();
        assert!(matches!(err, ParseError::TrailingTokens(_)));
    }

    #[test]
    fn test_execute_search_lists_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();
        std::fs::write(dir.path().join("b.txt"), "y").unwrap();

        let parsed = parse(&format!("select name from '{}'", dir.path().display())).unwrap();
        let QueryOutput::Table(table) = execute(&parsed).unwrap() else {
            panic!("expected a table");
        };
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), ["name"]);
    }

    #[test]
    fn test_execute_delete_reports_counts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();
        std::fs::write(dir.path().join("keep.log"), "y").unwrap();

        let parsed = parse(&format!(
            "delete from '{}' where name like '.*\\.txt'",
            dir.path().display()
        ))
        .unwrap();
        let QueryOutput::Deleted(outcome) = execute(&parsed).unwrap() else {
            panic!("expected a delete outcome");
        };
        assert_eq!(outcome.removed, 1);
        assert_eq!(outcome.skipped, 0);
        assert!(dir.path().join("keep.log").exists());
    }

    #[test]
    fn test_reparsing_a_query_is_equivalent() {
        let dir = tempfile::tempdir().unwrap();
        let text = format!(
            "r select name, size[KiB] from '{}' where size > 0 and name like '.*'",
            dir.path().display()
        );
        let first = parse(&text).unwrap();
        let second = parse(&text).unwrap();

        let (ParsedQuery::Search(a), ParsedQuery::Search(b)) = (&first, &second) else {
            panic!("expected search queries");
        };
        assert_eq!(a.entity, b.entity);
        assert_eq!(a.recursive, b.recursive);
        assert_eq!(a.path, b.path);
        let labels = |s: &SearchQuery| {
            s.projections
                .iter()
                .map(|p| p.label.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(labels(a), labels(b));
    }
}
