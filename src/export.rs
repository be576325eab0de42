//! Export of result tables to CSV and JSON files.
//!
//! The export destination and format are fixed at parse time; this
//! module only receives a finished table and writes it out. CSV exports
//! stringify every cell; JSON exports keep scalar types (integers stay
//! integers, absent values become `null`).

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::output::Table;
use crate::query::initials::{ExportFormat, ExportTarget};

/// Errors raised while writing an export file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode CSV for '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to encode JSON for '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Writes a result table to the destination fixed at parse time.
///
/// # Errors
/// Fails when the file cannot be created or a row cannot be encoded.
pub fn write_table(table: &Table, target: &ExportTarget) -> Result<(), ExportError> {
    match target.format {
        ExportFormat::Csv => write_csv(table, &target.path),
        ExportFormat::Json => write_json(table, &target.path),
    }
}

fn write_csv(table: &Table, path: &Path) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(table.columns()).map_err(csv_err)?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(ToString::to_string))
            .map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json(table: &Table, path: &Path) -> Result<(), ExportError> {
    let json_err = |source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    };

    let mut records: Vec<Map<String, JsonValue>> = Vec::with_capacity(table.len());
    for row in table.rows() {
        let mut record = Map::with_capacity(table.columns().len());
        for (column, value) in table.columns().iter().zip(row) {
            record.insert(column.clone(), serde_json::to_value(value).map_err(json_err)?);
        }
        records.push(record);
    }

    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), &records).map_err(json_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Value;

    fn sample() -> Table {
        let mut table = Table::new(vec!["name".into(), "size[KiB]".into()]);
        table.push_row(vec![Value::Str("a.txt".into()), Value::Float(2.0)]);
        table.push_row(vec![Value::Str("b.log".into()), Value::None]);
        table
    }

    #[test]
    fn test_csv_export_stringifies_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let target = ExportTarget {
            path: path.clone(),
            format: ExportFormat::Csv,
        };

        write_table(&sample(), &target).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "name,size[KiB]");
        assert_eq!(lines[1], "a.txt,2");
        assert_eq!(lines[2], "b.log,none");
    }

    #[test]
    fn test_json_export_keeps_scalar_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let target = ExportTarget {
            path: path.clone(),
            format: ExportFormat::Json,
        };

        write_table(&sample(), &target).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed[0]["name"], "a.txt");
        assert_eq!(parsed[0]["size[KiB]"], 2.0);
        assert!(parsed[1]["size[KiB]"].is_null());
    }
}
