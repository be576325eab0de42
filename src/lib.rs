//! fsq - a SQL-like query engine for the filesystem
//!
//! This library implements a compact query language for searching, filtering
//! and deleting filesystem entries. Queries are typed at a prompt and look
//! like SQL: an operation (`select`/`delete`), a projection list, a lookup
//! path and an optional `where` clause with boolean conditions.
//!
//! ```text
//! select name, size[KiB] from './src' where name like '.*\.rs' and size[KiB] > 10
//! r delete[type dir] from '/tmp/scratch' where name = 'cache'
//! ```
//!
//! The pipeline is: raw string -> tokenizer -> grammar parsers (shared token
//! queue) -> immutable parsed query -> per-entity query operator which lazily
//! enumerates filesystem entities, filters them through the condition
//! evaluator and projects or deletes the survivors.

use thiserror::Error;

pub mod cli;
pub mod config;
pub mod entities;
pub mod export;
pub mod output;
pub mod query;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum FsqError {
    /// Query could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] query::ParseError),
    /// Query parsed but failed during evaluation
    #[error("Operation error: {0}")]
    Operation(#[from] query::OperationError),
    /// Result table could not be exported
    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
