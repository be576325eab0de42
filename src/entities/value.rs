//! Scalar values produced by field evaluation and condition literals.
//!
//! Every projected cell and every condition operand resolves to a `Value`.
//! Comparison rules are deliberately loose for equality (mismatched types
//! are simply unequal) and strict for ordering (mismatched types are not
//! orderable and surface as an operation error in the evaluator).

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// Display/serialization format for datetime values.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A scalar value extracted from an entity or written as a query literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    DateTime(NaiveDateTime),
    Bool(bool),
    /// Absent value: the `none` literal, or metadata the platform
    /// could not provide.
    None,
}

impl Value {
    /// Human-readable type label used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::DateTime(_) => "datetime",
            Self::Bool(_) => "boolean",
            Self::None => "none",
        }
    }

    /// Ordering comparison between two values.
    ///
    /// Integers and floats compare numerically across the two types; all
    /// other combinations must match exactly. Returns `None` when the
    /// operands are not orderable, including any comparison involving an
    /// absent value.
    #[must_use]
    pub fn try_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Str(a), Self::Str(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Equality comparison between two values.
    ///
    /// Mismatched types are unequal rather than erroneous, so conditions
    /// like `owner = 'root'` remain well-defined when the field evaluates
    /// to an absent value.
    #[must_use]
    pub fn eq_loose(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Float(b)) => (*a as f64) == *b,
            (Self::Float(a), Self::Int(b)) => *a == (*b as f64),
            (Self::None, Self::None) => true,
            _ => self == other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Self::Bool(b) => write!(f, "{b}"),
            Self::None => write!(f, "none"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Str(s) => serializer.serialize_str(s),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::DateTime(dt) => {
                serializer.serialize_str(&dt.format(DATETIME_FORMAT).to_string())
            }
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::None => serializer.serialize_none(),
        }
    }
}
