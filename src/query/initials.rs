//! Leading clauses of a query: the optional export destination, the
//! recursion flag and the operation keyword with its bracketed
//! parameters.

use std::path::PathBuf;

use crate::entities::{EntityKind, ReadMode};

use super::fields::split_qualified;
use super::tokens::{split_list, strip_quotes, TokenQueue};
use super::ParseError;

/// File format of an export destination, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Destination of an `export` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub path: PathBuf,
    pub format: ExportFormat,
}

/// The operation a query performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Search,
    Delete,
}

/// Parsed operation initials.
#[derive(Debug, Clone, Copy)]
pub struct Initials {
    pub operation: OperationKind,
    pub entity: EntityKind,
    /// How data lines are read. Meaningful only for data searches.
    pub read_mode: ReadMode,
    /// Whether delete counts permission failures instead of aborting.
    pub skip_err: bool,
    pub recursive: bool,
}

/// Consumes an `export <target>` clause if one leads the queue.
///
/// # Errors
/// Fails when the destination already exists, sits in a missing
/// directory or carries an unsupported extension.
pub fn parse_export(queue: &mut TokenQueue) -> Result<Option<ExportTarget>, ParseError> {
    match queue.peek() {
        Some(front) if front.eq_ignore_ascii_case("export") => {}
        _ => return Ok(None),
    }
    queue.pop()?;

    let token = queue.pop()?;
    let raw = strip_quotes(&token);
    let path = PathBuf::from(raw);

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);
    let format = match extension.as_deref() {
        Some("csv") => ExportFormat::Csv,
        Some("json") => ExportFormat::Json,
        _ => return Err(ParseError::UnsupportedExportFormat(raw.to_string())),
    };

    if path.exists() {
        return Err(ParseError::ExportTargetExists(path));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(ParseError::ExportParentMissing(path));
        }
    }

    Ok(Some(ExportTarget { path, format }))
}

/// Parses the recursion flag and the operation keyword with its
/// parameters.
///
/// # Errors
/// Fails on an unknown operation, an unknown or misapplied parameter,
/// or a delete operation combined with an export clause.
pub fn parse_initials(queue: &mut TokenQueue, exporting: bool) -> Result<Initials, ParseError> {
    let mut recursive = false;
    if let Some(front) = queue.peek() {
        if front.eq_ignore_ascii_case("r") || front.eq_ignore_ascii_case("recursive") {
            queue.pop()?;
            recursive = true;
        }
    }

    let token = queue.pop()?;
    let (keyword, params) = split_qualified(&token)?;
    let operation = match keyword.to_lowercase().as_str() {
        "select" => OperationKind::Search,
        "delete" => OperationKind::Delete,
        other => return Err(ParseError::InvalidOperation(other.to_string())),
    };

    if exporting && operation == OperationKind::Delete {
        return Err(ParseError::ExportWithDelete);
    }

    let mut entity = EntityKind::File;
    let mut read_mode: Option<ReadMode> = None;
    let mut skip_err: Option<bool> = None;

    if !params.is_empty() {
        for item in split_list(params)? {
            let words: Vec<&str> = item.split_whitespace().collect();
            let [key, value] = words[..] else {
                return Err(ParseError::InvalidParameter(item.clone()));
            };

            match key.to_lowercase().as_str() {
                "type" => {
                    entity = match value.to_lowercase().as_str() {
                        "file" => EntityKind::File,
                        "dir" => EntityKind::Dir,
                        "data" => EntityKind::Data,
                        _ => return Err(ParseError::InvalidParameter(item.clone())),
                    };
                }
                "mode" => {
                    read_mode = Some(match value.to_lowercase().as_str() {
                        "text" => ReadMode::Text,
                        "bytes" => ReadMode::Bytes,
                        _ => return Err(ParseError::InvalidParameter(item.clone())),
                    });
                }
                "skip_err" => {
                    skip_err = Some(match value.to_lowercase().as_str() {
                        "true" => true,
                        "false" => false,
                        _ => return Err(ParseError::InvalidParameter(item.clone())),
                    });
                }
                _ => return Err(ParseError::InvalidParameter(item.clone())),
            }
        }
    }

    // The read mode only applies when searching data lines, and the
    // skip-error flag only applies to deletion.
    if read_mode.is_some() && (operation != OperationKind::Search || entity != EntityKind::Data) {
        return Err(ParseError::InvalidParameter("mode".into()));
    }
    if skip_err.is_some() && operation != OperationKind::Delete {
        return Err(ParseError::InvalidParameter("skip_err".into()));
    }

    Ok(Initials {
        operation,
        entity,
        read_mode: read_mode.unwrap_or_default(),
        skip_err: skip_err.unwrap_or(false),
        recursive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(text: &str) -> TokenQueue {
        TokenQueue::from_query(text).unwrap()
    }

    #[test]
    fn test_defaults() {
        let initials = parse_initials(&mut queue("select *"), false).unwrap();
        assert_eq!(initials.operation, OperationKind::Search);
        assert_eq!(initials.entity, EntityKind::File);
        assert_eq!(initials.read_mode, ReadMode::Text);
        assert!(!initials.skip_err);
        assert!(!initials.recursive);
    }

    #[test]
    fn test_recursion_flag_forms() {
        assert!(parse_initials(&mut queue("r select *"), false)
            .unwrap()
            .recursive);
        assert!(parse_initials(&mut queue("recursive select *"), false)
            .unwrap()
            .recursive);
        assert!(parse_initials(&mut queue("RECURSIVE select *"), false)
            .unwrap()
            .recursive);
    }

    #[test]
    fn test_bracketed_parameters() {
        let initials =
            parse_initials(&mut queue("select[type data, mode bytes] *"), false).unwrap();
        assert_eq!(initials.entity, EntityKind::Data);
        assert_eq!(initials.read_mode, ReadMode::Bytes);

        let initials =
            parse_initials(&mut queue("delete[type dir, skip_err true] from"), false).unwrap();
        assert_eq!(initials.operation, OperationKind::Delete);
        assert_eq!(initials.entity, EntityKind::Dir);
        assert!(initials.skip_err);
    }

    #[test]
    fn test_parameter_misuse_is_fatal() {
        // mode applies to data searches only.
        assert!(parse_initials(&mut queue("select[mode bytes] *"), false).is_err());
        assert!(parse_initials(&mut queue("delete[type data, mode bytes]"), false).is_err());
        // skip_err applies to deletion only.
        assert!(parse_initials(&mut queue("select[type file, skip_err true] *"), false).is_err());
        // Unknown names and values.
        assert!(parse_initials(&mut queue("select[flavor spicy] *"), false).is_err());
        assert!(parse_initials(&mut queue("select[type folder] *"), false).is_err());
    }

    #[test]
    fn test_unknown_operation() {
        let err = parse_initials(&mut queue("upsert * from '.'"), false).unwrap_err();
        assert!(matches!(err, ParseError::InvalidOperation(_)));
    }

    #[test]
    fn test_export_with_delete_is_fatal() {
        let err = parse_initials(&mut queue("delete[type file] from '.'"), true).unwrap_err();
        assert!(matches!(err, ParseError::ExportWithDelete));
    }

    #[test]
    fn test_export_clause_absent() {
        let mut q = queue("select * from '.'");
        assert!(parse_export(&mut q).unwrap().is_none());
        assert_eq!(q.len(), 4);
    }

    #[test]
    fn test_export_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("out.csv");
        let mut q = queue(&format!("export '{}' select *", csv.display()));
        let target = parse_export(&mut q).unwrap().unwrap();
        assert_eq!(target.format, ExportFormat::Csv);
        assert_eq!(target.path, csv);

        let json = dir.path().join("out.json");
        let mut q = queue(&format!("export {} select *", json.display()));
        assert_eq!(
            parse_export(&mut q).unwrap().unwrap().format,
            ExportFormat::Json
        );
    }

    #[test]
    fn test_export_target_validation() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("taken.csv");
        std::fs::write(&existing, "x").unwrap();

        let mut q = queue(&format!("export '{}'", existing.display()));
        assert!(matches!(
            parse_export(&mut q).unwrap_err(),
            ParseError::ExportTargetExists(_)
        ));

        let orphan = dir.path().join("missing/out.csv");
        let mut q = queue(&format!("export '{}'", orphan.display()));
        assert!(matches!(
            parse_export(&mut q).unwrap_err(),
            ParseError::ExportParentMissing(_)
        ));

        let mut q = queue(&format!("export '{}'", dir.path().join("out.xml").display()));
        assert!(matches!(
            parse_export(&mut q).unwrap_err(),
            ParseError::UnsupportedExportFormat(_)
        ));
    }
}
