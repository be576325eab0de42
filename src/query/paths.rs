//! Path clause: `from [absolute|relative] <path>`.

use std::path::PathBuf;

use crate::entities::EntityKind;

use super::tokens::{strip_quotes, TokenQueue};
use super::ParseError;

/// The validated root a query operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPath {
    pub path: PathBuf,
    /// Whether results report absolute paths.
    pub absolute: bool,
}

/// Consumes the `from` clause and validates the path against the
/// entity kind: file and directory operations need a directory, data
/// operations accept a file or a directory.
///
/// # Errors
/// Fails when `from` is missing, or the path does not exist or has the
/// wrong kind.
pub fn parse_path(queue: &mut TokenQueue, entity: EntityKind) -> Result<QueryPath, ParseError> {
    let keyword = queue.pop()?;
    if !keyword.eq_ignore_ascii_case("from") {
        return Err(ParseError::ExpectedKeyword {
            expected: "from",
            found: keyword,
        });
    }

    let mut absolute = false;
    let mut token = queue.pop()?;
    if token.eq_ignore_ascii_case("absolute") {
        absolute = true;
        token = queue.pop()?;
    } else if token.eq_ignore_ascii_case("relative") {
        token = queue.pop()?;
    }

    let mut path = PathBuf::from(strip_quotes(&token));

    let valid = match entity {
        EntityKind::File | EntityKind::Dir => path.is_dir(),
        EntityKind::Data => path.exists(),
    };
    if !valid {
        let expected = match entity {
            EntityKind::File | EntityKind::Dir => "directory",
            EntityKind::Data => "file or directory",
        };
        return Err(ParseError::PathKindMismatch { path, expected });
    }

    if absolute {
        path = path
            .canonicalize()
            .map_err(|_| ParseError::UnresolvablePath(path.clone()))?;
    }

    Ok(QueryPath { path, absolute })
}
