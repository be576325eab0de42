//! Query field model: named fields and unit-scaled size fields.
//!
//! A `Field` is a projection/condition operand naming an entity attribute,
//! resolved to its canonical name at parse time. `SizeField` specializes
//! it with a storage-unit divisor: it evaluates to the entity's byte size
//! divided by the divisor, rounded to 5 decimals.

use super::ParseError;
use crate::entities::{Entity, EntityKind, FieldName, Session, Value};

/// Storage unit labels and their divisors relative to one byte.
/// Decimal units scale by powers of 1000, binary units by powers of 1024,
/// and bit units are one eighth of their byte counterparts.
pub const SIZE_UNITS: &[(&str, f64)] = &[
    ("b", 0.125),
    ("B", 1.0),
    ("Kb", 125.0),
    ("KB", 1e3),
    ("Kib", 128.0),
    ("KiB", 1024.0),
    ("Mb", 1.25e5),
    ("MB", 1e6),
    ("Mib", 131_072.0),
    ("MiB", 1_048_576.0),
    ("Gb", 1.25e8),
    ("GB", 1e9),
    ("Gib", 134_217_728.0),
    ("GiB", 1_073_741_824.0),
    ("Tb", 1.25e11),
    ("TB", 1e12),
    ("Tib", 137_438_953_472.0),
    ("TiB", 1_099_511_627_776.0),
];

/// A reference to a named entity field, resolved at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    name: FieldName,
}

impl Field {
    /// Resolves a raw (possibly aliased, case-insensitive) field name
    /// against the given entity kind.
    ///
    /// # Errors
    /// Fails when the name is unknown to the entity kind.
    pub fn parse(raw: &str, entity: EntityKind) -> Result<Self, ParseError> {
        let name = entity
            .resolve_field(&raw.to_lowercase())
            .ok_or_else(|| ParseError::InvalidField(raw.to_string()))?;
        Ok(Self { name })
    }

    #[must_use]
    pub const fn new(name: FieldName) -> Self {
        Self { name }
    }

    #[must_use]
    pub const fn name(&self) -> FieldName {
        self.name
    }

    /// Extracts the field's value from the entity, substituting an absent
    /// value (with a once-per-session alert) when unavailable.
    pub fn evaluate<E: Entity>(&self, entity: &E, session: &mut Session) -> Value {
        match entity.field(self.name) {
            Some(value) => value,
            None => {
                session.warn_metadata();
                Value::None
            }
        }
    }
}

/// The `size` field qualified with a storage unit, e.g. `size[KiB]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeField {
    divisor: f64,
}

impl SizeField {
    /// Parses a unit label into a size field. An empty label defaults to
    /// bytes. Unit labels are case-sensitive (`Kb` and `KB` differ).
    ///
    /// # Errors
    /// Fails on an unknown unit label.
    pub fn parse(unit: &str) -> Result<Self, ParseError> {
        let unit = if unit.is_empty() { "B" } else { unit };
        let divisor = SIZE_UNITS
            .iter()
            .find(|(label, _)| *label == unit)
            .map(|(_, divisor)| *divisor)
            .ok_or_else(|| ParseError::InvalidSizeUnit(unit.to_string()))?;
        Ok(Self { divisor })
    }

    /// The unqualified `size` field, reporting plain bytes.
    #[must_use]
    pub const fn bytes() -> Self {
        Self { divisor: 1.0 }
    }

    /// Byte size divided by the unit divisor, rounded to 5 decimals.
    pub fn evaluate<E: Entity>(&self, entity: &E, session: &mut Session) -> Value {
        match entity.byte_size() {
            Some(bytes) => Value::Float(round5(bytes as f64 / self.divisor)),
            None => {
                session.warn_metadata();
                Value::None
            }
        }
    }
}

fn round5(value: f64) -> f64 {
    (value * 1e5).round() / 1e5
}

/// Splits a clause like `size[KiB]` into its name and bracketed argument.
/// Returns an empty argument when no bracket is present.
///
/// # Errors
/// Fails when the clause is malformed (text after the closing bracket).
pub fn split_qualified(clause: &str) -> Result<(&str, &str), ParseError> {
    match clause.find('[') {
        Some(start) => {
            if !clause.ends_with(']') {
                return Err(ParseError::InvalidSyntax(clause.to_string()));
            }
            Ok((&clause[..start], &clause[start + 1..clause.len() - 1]))
        }
        None => Ok((clause, "")),
    }
}
