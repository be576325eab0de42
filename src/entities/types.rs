//! Concrete entity types: files, directories and data lines.
//!
//! Entities are cheap snapshots constructed on demand during enumeration
//! and discarded after filtering/projection. Metadata is read once at
//! construction; fields the platform cannot provide evaluate to `None`.

use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime};

use super::{Entity, FieldName, Value};

/// Path plus stat results shared by file and directory entities.
#[derive(Debug)]
struct PathMeta {
    path: PathBuf,
    metadata: Option<Metadata>,
}

impl PathMeta {
    fn new(path: PathBuf) -> Self {
        let metadata = fs::metadata(&path).ok();
        Self { path, metadata }
    }

    fn name(&self) -> Value {
        Value::Str(
            self.path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        )
    }

    fn path_str(&self) -> Value {
        Value::Str(self.path.to_string_lossy().into_owned())
    }

    fn parent(&self) -> Option<Value> {
        self.path
            .parent()
            .map(|p| Value::Str(p.to_string_lossy().into_owned()))
    }

    fn time(&self, pick: fn(&Metadata) -> std::io::Result<SystemTime>) -> Option<Value> {
        let st = pick(self.metadata.as_ref()?).ok()?;
        Some(Value::DateTime(to_naive(st)))
    }

    #[cfg(unix)]
    fn owner(&self) -> Option<Value> {
        use std::os::unix::fs::MetadataExt;
        Some(Value::Int(i64::from(self.metadata.as_ref()?.uid())))
    }

    #[cfg(not(unix))]
    fn owner(&self) -> Option<Value> {
        None
    }

    #[cfg(unix)]
    fn group(&self) -> Option<Value> {
        use std::os::unix::fs::MetadataExt;
        Some(Value::Int(i64::from(self.metadata.as_ref()?.gid())))
    }

    #[cfg(not(unix))]
    fn group(&self) -> Option<Value> {
        None
    }

    #[cfg(unix)]
    fn permissions(&self) -> Option<Value> {
        use std::os::unix::fs::MetadataExt;
        Some(Value::Int(i64::from(self.metadata.as_ref()?.mode())))
    }

    #[cfg(not(unix))]
    fn permissions(&self) -> Option<Value> {
        None
    }

    fn filetype(&self) -> Option<Value> {
        self.path
            .extension()
            .map(|ext| Value::Str(format!(".{}", ext.to_string_lossy())))
    }
}

fn to_naive(st: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(st).naive_local()
}

/// Metadata snapshot of a single file.
#[derive(Debug)]
pub struct FileEntity {
    meta: PathMeta,
}

impl FileEntity {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            meta: PathMeta::new(path),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.meta.path
    }
}

impl Entity for FileEntity {
    fn field(&self, name: FieldName) -> Option<Value> {
        match name {
            FieldName::Name => Some(self.meta.name()),
            FieldName::Path => Some(self.meta.path_str()),
            FieldName::Parent => self.meta.parent(),
            FieldName::AccessTime => self.meta.time(Metadata::accessed),
            FieldName::CreateTime => self.meta.time(Metadata::created),
            FieldName::ModifyTime => self.meta.time(Metadata::modified),
            FieldName::Owner => self.meta.owner(),
            FieldName::Group => self.meta.group(),
            FieldName::Permissions => self.meta.permissions(),
            FieldName::Size => self.byte_size().map(|s| Value::Int(s as i64)),
            FieldName::Filetype => self.meta.filetype(),
            FieldName::Lineno | FieldName::Dataline => None,
        }
    }

    fn byte_size(&self) -> Option<u64> {
        self.meta.metadata.as_ref().map(Metadata::len)
    }
}

/// Metadata snapshot of a single directory.
#[derive(Debug)]
pub struct DirEntity {
    meta: PathMeta,
}

impl DirEntity {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            meta: PathMeta::new(path),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.meta.path
    }
}

impl Entity for DirEntity {
    fn field(&self, name: FieldName) -> Option<Value> {
        match name {
            FieldName::Name => Some(self.meta.name()),
            FieldName::Path => Some(self.meta.path_str()),
            FieldName::Parent => self.meta.parent(),
            FieldName::AccessTime => self.meta.time(Metadata::accessed),
            FieldName::CreateTime => self.meta.time(Metadata::created),
            FieldName::ModifyTime => self.meta.time(Metadata::modified),
            FieldName::Owner => self.meta.owner(),
            FieldName::Group => self.meta.group(),
            FieldName::Permissions => self.meta.permissions(),
            _ => None,
        }
    }
}

/// One line of content inside a file, with its location metadata.
///
/// Byte-mode lines are decoded lossily so that conditions and projections
/// always observe text; line numbers are 1-based.
#[derive(Debug, Clone)]
pub struct DataLine {
    path: PathBuf,
    lineno: u64,
    line: String,
}

impl DataLine {
    #[must_use]
    pub fn new(path: PathBuf, lineno: u64, line: String) -> Self {
        Self { path, lineno, line }
    }

    #[must_use]
    pub fn lineno(&self) -> u64 {
        self.lineno
    }

    #[must_use]
    pub fn line(&self) -> &str {
        &self.line
    }
}

impl Entity for DataLine {
    fn field(&self, name: FieldName) -> Option<Value> {
        match name {
            FieldName::Name => Some(Value::Str(
                self.path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            )),
            FieldName::Path => Some(Value::Str(self.path.to_string_lossy().into_owned())),
            FieldName::Lineno => Some(Value::Int(self.lineno as i64)),
            FieldName::Dataline => Some(Value::Str(self.line.clone())),
            FieldName::Filetype => self
                .path
                .extension()
                .map(|ext| Value::Str(format!(".{}", ext.to_string_lossy()))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_file_entity_basic_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"hello").unwrap();

        let entity = FileEntity::new(path.clone());
        assert_eq!(
            entity.field(FieldName::Name),
            Some(Value::Str("report.txt".into()))
        );
        assert_eq!(
            entity.field(FieldName::Filetype),
            Some(Value::Str(".txt".into()))
        );
        assert_eq!(entity.field(FieldName::Size), Some(Value::Int(5)));
        assert_eq!(entity.byte_size(), Some(5));
        assert!(matches!(
            entity.field(FieldName::ModifyTime),
            Some(Value::DateTime(_))
        ));
    }

    #[test]
    fn test_missing_file_metadata_degrades_to_none() {
        let entity = FileEntity::new(PathBuf::from("/definitely/not/here.txt"));
        assert_eq!(entity.field(FieldName::ModifyTime), None);
        assert_eq!(entity.byte_size(), None);
        // Purely path-derived fields still work.
        assert_eq!(
            entity.field(FieldName::Name),
            Some(Value::Str("here.txt".into()))
        );
    }

    #[test]
    fn test_dataline_fields() {
        let line = DataLine::new(PathBuf::from("/src/main.rs"), 3, "fn main() {}".into());
        assert_eq!(line.field(FieldName::Lineno), Some(Value::Int(3)));
        assert_eq!(
            line.field(FieldName::Dataline),
            Some(Value::Str("fn main() {}".into()))
        );
        assert_eq!(
            line.field(FieldName::Filetype),
            Some(Value::Str(".rs".into()))
        );
        // Data lines have no stat-derived fields.
        assert_eq!(line.field(FieldName::Size), None);
    }
}
