//! Projection clause of a search query: the fields between the
//! operation keyword and `from`.

use crate::entities::{Entity, EntityKind, FieldName, Session, Value};

use super::fields::{split_qualified, Field, SizeField};
use super::tokens::{split_list, TokenQueue};
use super::ParseError;

/// The evaluatable part of one projection.
#[derive(Debug, Clone)]
pub enum ProjectionField {
    Named(Field),
    Sized(SizeField),
}

/// One output column: a field to evaluate and the display label under
/// which its values appear, spelled exactly as the query wrote it
/// (`size[KiB]` stays `size[KiB]`).
#[derive(Debug, Clone)]
pub struct Projection {
    pub label: String,
    pub field: ProjectionField,
}

impl Projection {
    fn named(label: &str, field: Field) -> Self {
        Self {
            label: label.to_string(),
            field: ProjectionField::Named(field),
        }
    }

    /// Evaluates this projection against one entity.
    pub fn evaluate<E: Entity>(&self, entity: &E, session: &mut Session) -> Value {
        match &self.field {
            ProjectionField::Named(field) => field.evaluate(entity, session),
            ProjectionField::Sized(size) => size.evaluate(entity, session),
        }
    }
}

/// Parses the projection list, consuming tokens up to (but not
/// including) the `from` keyword.
///
/// # Errors
/// Fails when `from` never appears, the list is empty, or a field or
/// size unit is unknown to the entity kind.
pub fn parse_projections(
    queue: &mut TokenQueue,
    entity: EntityKind,
) -> Result<Vec<Projection>, ParseError> {
    let mut raw: Vec<String> = Vec::new();
    loop {
        match queue.peek() {
            None => return Err(ParseError::UnexpectedEnd),
            Some(front) if front.eq_ignore_ascii_case("from") => break,
            Some(_) => raw.push(queue.pop()?),
        }
    }

    // Commas may arrive fused to their neighbours or as separate tokens;
    // joining first makes both spellings equivalent.
    let joined = raw.concat();
    let mut projections = Vec::new();

    for item in split_list(&joined)? {
        if item.is_empty() {
            continue;
        }
        if item == "*" {
            for name in entity.fields() {
                projections.push(expand_star_field(*name));
            }
            continue;
        }
        projections.push(parse_projection(&item, entity)?);
    }

    if projections.is_empty() {
        return Err(ParseError::InvalidSyntax("no fields to select".into()));
    }

    Ok(projections)
}

/// One column of a `*` expansion. The size column reports plain bytes.
fn expand_star_field(name: FieldName) -> Projection {
    if name == FieldName::Size {
        Projection {
            label: name.canonical().to_string(),
            field: ProjectionField::Sized(SizeField::bytes()),
        }
    } else {
        Projection::named(name.canonical(), Field::new(name))
    }
}

fn parse_projection(item: &str, entity: EntityKind) -> Result<Projection, ParseError> {
    let (name, unit) = split_qualified(item)?;

    if name.eq_ignore_ascii_case("size") {
        if !entity.has_size() {
            return Err(ParseError::InvalidField(item.to_string()));
        }
        return Ok(Projection {
            label: item.to_string(),
            field: ProjectionField::Sized(SizeField::parse(unit)?),
        });
    }
    if !unit.is_empty() {
        // Only the size field takes a bracketed argument.
        return Err(ParseError::InvalidField(item.to_string()));
    }

    Ok(Projection::named(item, Field::parse(name, entity)?))
}
