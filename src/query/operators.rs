//! Query operators: the per-entity-kind search and delete executors.
//!
//! Each operator enumerates entities lazily through the provider,
//! filters them through the condition evaluator and either assembles a
//! result table or removes the matches from disk.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::entities::{
    directories, files, DataLineIter, DirEntity, Entity, FileEntity, ReadMode, Session,
};
use crate::output::Table;

use super::conditions::ConditionExpr;
use super::projections::Projection;
use super::OperationError;

/// Summary of a completed delete operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub removed: u64,
    pub skipped: u64,
}

fn search_rows<E, I>(
    entities: I,
    projections: &[Projection],
    condition: &ConditionExpr,
    session: &mut Session,
) -> Result<Table, OperationError>
where
    E: Entity,
    I: Iterator<Item = E>,
{
    let columns = projections.iter().map(|p| p.label.clone()).collect();
    let mut table = Table::new(columns);

    for entity in entities {
        if condition.evaluate(&entity, session)? {
            let row = projections
                .iter()
                .map(|projection| projection.evaluate(&entity, session))
                .collect();
            table.push_row(row);
        }
    }

    Ok(table)
}

/// Searches and deletes files under a directory.
pub struct FileQueryOperator<'a> {
    root: &'a Path,
    recursive: bool,
}

impl<'a> FileQueryOperator<'a> {
    #[must_use]
    pub fn new(root: &'a Path, recursive: bool) -> Self {
        Self { root, recursive }
    }

    /// Collects matching files into a table of projected fields.
    ///
    /// # Errors
    /// Fails when the condition compares incomparable operand types.
    pub fn search(
        &self,
        projections: &[Projection],
        condition: &ConditionExpr,
        session: &mut Session,
    ) -> Result<Table, OperationError> {
        let entities = files(self.root, self.recursive).map(FileEntity::new);
        search_rows(entities, projections, condition, session)
    }

    /// Removes matching files, counting permission failures when
    /// `skip_err` is set and aborting on them otherwise.
    ///
    /// # Errors
    /// Fails on condition evaluation errors and unrecovered removal
    /// failures.
    pub fn delete(
        &self,
        condition: &ConditionExpr,
        skip_err: bool,
        session: &mut Session,
    ) -> Result<DeleteOutcome, OperationError> {
        let mut outcome = DeleteOutcome::default();

        for path in files(self.root, self.recursive) {
            let entity = FileEntity::new(path.clone());
            if !condition.evaluate(&entity, session)? {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => outcome.removed += 1,
                Err(err) if err.kind() == ErrorKind::PermissionDenied && skip_err => {
                    outcome.skipped += 1;
                }
                Err(source) => return Err(OperationError::Removal { path, source }),
            }
        }

        Ok(outcome)
    }
}

/// Searches and deletes directories under a directory.
pub struct DirQueryOperator<'a> {
    root: &'a Path,
    recursive: bool,
}

impl<'a> DirQueryOperator<'a> {
    #[must_use]
    pub fn new(root: &'a Path, recursive: bool) -> Self {
        Self { root, recursive }
    }

    /// Collects matching directories into a table of projected fields.
    ///
    /// # Errors
    /// Fails when the condition compares incomparable operand types.
    pub fn search(
        &self,
        projections: &[Projection],
        condition: &ConditionExpr,
        session: &mut Session,
    ) -> Result<Table, OperationError> {
        let entities = directories(self.root, self.recursive).map(DirEntity::new);
        search_rows(entities, projections, condition, session)
    }

    /// Removes matching directories with their entire subtrees.
    ///
    /// # Errors
    /// Fails on condition evaluation errors and unrecovered removal
    /// failures.
    pub fn delete(
        &self,
        condition: &ConditionExpr,
        skip_err: bool,
        session: &mut Session,
    ) -> Result<DeleteOutcome, OperationError> {
        let mut outcome = DeleteOutcome::default();

        for path in directories(self.root, self.recursive) {
            let entity = DirEntity::new(path.clone());
            if !condition.evaluate(&entity, session)? {
                continue;
            }
            match fs::remove_dir_all(&path) {
                Ok(()) => outcome.removed += 1,
                // Already gone with a removed ancestor's subtree.
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) if err.kind() == ErrorKind::PermissionDenied && skip_err => {
                    outcome.skipped += 1;
                }
                Err(source) => return Err(OperationError::Removal { path, source }),
            }
        }

        Ok(outcome)
    }
}

/// Searches data lines inside a file or the files under a directory.
pub struct DataQueryOperator<'a> {
    root: &'a Path,
    recursive: bool,
    mode: ReadMode,
}

impl<'a> DataQueryOperator<'a> {
    #[must_use]
    pub fn new(root: &'a Path, recursive: bool, mode: ReadMode) -> Self {
        Self {
            root,
            recursive,
            mode,
        }
    }

    /// Collects matching data lines into a table of projected fields.
    ///
    /// # Errors
    /// Fails on unreadable content (non-text files in text mode, I/O
    /// failures) and on incomparable condition operands.
    pub fn search(
        &self,
        projections: &[Projection],
        condition: &ConditionExpr,
        session: &mut Session,
    ) -> Result<Table, OperationError> {
        let columns = projections.iter().map(|p| p.label.clone()).collect();
        let mut table = Table::new(columns);

        for line in DataLineIter::new(self.root, self.recursive, self.mode) {
            let line = line?;
            if condition.evaluate(&line, session)? {
                let row = projections
                    .iter()
                    .map(|projection| projection.evaluate(&line, session))
                    .collect();
                table.push_row(row);
            }
        }

        Ok(table)
    }
}
