//! Filesystem entity model
//!
//! The query engine operates over three entity kinds: files, directories
//! and data lines (lines of text or byte content inside files). Each kind
//! exposes a fixed set of named metadata fields which projections and
//! conditions draw from through the read-only [`Entity`] interface.

pub mod provider;
pub mod types;
pub mod value;

pub use provider::{directories, files, DataLineIter, ReadMode};
pub use types::{DataLine, DirEntity, FileEntity};
pub use value::Value;

use crate::output;

/// The kind of filesystem entity a query operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    File,
    Dir,
    Data,
}

/// Canonical entity field names.
///
/// Parsed field references resolve to one of these variants exactly once,
/// at parse time; evaluation is a direct accessor dispatch with no string
/// lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldName {
    Name,
    Path,
    Parent,
    AccessTime,
    CreateTime,
    ModifyTime,
    Owner,
    Group,
    Permissions,
    Size,
    Filetype,
    Lineno,
    Dataline,
}

impl FieldName {
    /// The canonical spelling used in queries and `*` expansions.
    #[must_use]
    pub const fn canonical(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Path => "path",
            Self::Parent => "parent",
            Self::AccessTime => "access_time",
            Self::CreateTime => "create_time",
            Self::ModifyTime => "modify_time",
            Self::Owner => "owner",
            Self::Group => "group",
            Self::Permissions => "permissions",
            Self::Size => "size",
            Self::Filetype => "filetype",
            Self::Lineno => "lineno",
            Self::Dataline => "dataline",
        }
    }
}

const FILE_FIELDS: &[FieldName] = &[
    FieldName::Name,
    FieldName::Path,
    FieldName::Parent,
    FieldName::AccessTime,
    FieldName::CreateTime,
    FieldName::ModifyTime,
    FieldName::Owner,
    FieldName::Group,
    FieldName::Permissions,
    FieldName::Size,
    FieldName::Filetype,
];

const DIR_FIELDS: &[FieldName] = &[
    FieldName::Name,
    FieldName::Path,
    FieldName::Parent,
    FieldName::AccessTime,
    FieldName::CreateTime,
    FieldName::ModifyTime,
    FieldName::Owner,
    FieldName::Group,
    FieldName::Permissions,
];

const DATA_FIELDS: &[FieldName] = &[
    FieldName::Name,
    FieldName::Path,
    FieldName::Lineno,
    FieldName::Dataline,
    FieldName::Filetype,
];

impl EntityKind {
    /// Entity name as written in query parameters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Dir => "dir",
            Self::Data => "data",
        }
    }

    /// All fields of this entity kind, in canonical `*` expansion order.
    #[must_use]
    pub const fn fields(self) -> &'static [FieldName] {
        match self {
            Self::File => FILE_FIELDS,
            Self::Dir => DIR_FIELDS,
            Self::Data => DATA_FIELDS,
        }
    }

    /// Resolves a lowercased field name or alias to its canonical field.
    ///
    /// Returns `None` for names unknown to this entity kind.
    #[must_use]
    pub fn resolve_field(self, name: &str) -> Option<FieldName> {
        let resolved = match (self, name) {
            (Self::File | Self::Dir, "atime") => "access_time",
            (Self::File | Self::Dir, "mtime") => "modify_time",
            (Self::File | Self::Dir, "ctime") => "create_time",
            (Self::File | Self::Dir, "perms") => "permissions",
            (Self::File | Self::Data, "filename") => "name",
            (Self::File | Self::Data, "filepath") => "path",
            (Self::File | Self::Data, "type") => "filetype",
            (Self::Data, "line") => "lineno",
            (Self::Data, "data") => "dataline",
            _ => name,
        };

        self.fields()
            .iter()
            .copied()
            .find(|field| field.canonical() == resolved)
    }

    /// Whether this entity kind carries a byte size.
    #[must_use]
    pub const fn has_size(self) -> bool {
        matches!(self, Self::File)
    }
}

/// Read-only view over one enumerated filesystem entity.
///
/// Accessors return `None` for fields the platform could not provide;
/// the caller substitutes an absent value and warns once per session.
pub trait Entity {
    /// Extracts the value of the named metadata field.
    fn field(&self, name: FieldName) -> Option<Value>;

    /// Raw byte size, for entities that have one.
    fn byte_size(&self) -> Option<u64> {
        None
    }
}

/// Mutable per-query execution state.
///
/// Owns the "already warned about unavailable metadata" flag so that a
/// query emits that alert at most once, without any process-global state.
#[derive(Debug, Default)]
pub struct Session {
    metadata_warned: bool,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports unavailable metadata once; subsequent calls are silent.
    pub fn warn_metadata(&mut self) {
        if !self.metadata_warned {
            output::alert(
                "Some metadata fields are unavailable for the recorded \
                 entries and are being reported as 'none'.",
            );
            self.metadata_warned = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_resolution() {
        assert_eq!(
            EntityKind::File.resolve_field("atime"),
            Some(FieldName::AccessTime)
        );
        assert_eq!(
            EntityKind::File.resolve_field("perms"),
            Some(FieldName::Permissions)
        );
        assert_eq!(
            EntityKind::Data.resolve_field("line"),
            Some(FieldName::Lineno)
        );
        assert_eq!(
            EntityKind::Data.resolve_field("data"),
            Some(FieldName::Dataline)
        );
    }

    #[test]
    fn test_fields_are_scoped_per_entity() {
        // Directories have no size and data lines have no owner.
        assert_eq!(EntityKind::Dir.resolve_field("size"), None);
        assert_eq!(EntityKind::Data.resolve_field("owner"), None);
        assert_eq!(EntityKind::File.resolve_field("size"), Some(FieldName::Size));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert_eq!(EntityKind::File.resolve_field("bogus"), None);
    }

    #[test]
    fn test_star_expansion_order_is_stable() {
        let names: Vec<&str> = EntityKind::Data
            .fields()
            .iter()
            .map(|f| f.canonical())
            .collect();
        assert_eq!(names, ["name", "path", "lineno", "dataline", "filetype"]);
    }
}
