//! Condition model, parser and evaluator for `where` clauses.
//!
//! A parsed `where` clause is an alternating sequence of condition groups
//! and `and`/`or` connectives. Each group is either an atomic
//! `(operand, operator, operand)` predicate or a parenthesized
//! sub-expression, which is re-tokenized and parsed recursively.
//!
//! Evaluation preserves the rule that `and` binds tighter than `or`: a
//! synthetic leading `true and` gives every group a uniform three-wide
//! window, a first pass reduces every `and`-joined window left to right,
//! and a second pass folds the remaining `or`-joined booleans.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use super::fields::{split_qualified, Field, SizeField};
use super::tokens::{split_list, tokenize};
use super::{OperationError, ParseError};
use crate::entities::{Entity, EntityKind, Session, Value};

static INT_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+$").unwrap());
static FLOAT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+\.\d+$").unwrap());
static DATETIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}( \d{1,2}:\d{1,2}:\d{1,2})?$").unwrap());

/// Symbolic operators in descending length order so that fused clauses
/// like `size>=10` split on the longest match first.
const SYMBOLIC_OPERATORS: &[&str] = &[">=", "<=", "!=", ">", "<", "="];

/// Logical connective joining two condition groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

/// Operator of an atomic condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondOp {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
    Like,
    In,
    Between,
}

impl CondOp {
    fn parse(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            "=" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            "like" => Some(Self::Like),
            "in" => Some(Self::In),
            "between" => Some(Self::Between),
            _ => None,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Like => "like",
            Self::In => "in",
            Self::Between => "between",
        }
    }
}

/// One operand of an atomic condition.
#[derive(Debug, Clone)]
pub enum Operand {
    /// Literal scalar written directly in the query.
    Literal(Value),
    /// Named entity field, resolved at evaluation time per entity.
    Field(Field),
    /// Unit-scaled size field.
    Size(SizeField),
    /// Compiled `like` pattern, anchored at the start of the subject.
    Pattern(Regex),
    /// Tuple of operands for `in`/`between`.
    List(Vec<Operand>),
}

/// One atomic predicate.
#[derive(Debug, Clone)]
pub struct Condition {
    pub left: Operand,
    pub op: CondOp,
    pub right: Operand,
}

/// A condition group: atomic, or a nested parenthesized expression.
#[derive(Debug, Clone)]
pub enum ConditionNode {
    Atom(Condition),
    Group(ConditionExpr),
}

/// A full `where` clause. An empty expression is always true.
#[derive(Debug, Clone, Default)]
pub struct ConditionExpr {
    nodes: Vec<ConditionNode>,
    connectives: Vec<Connective>,
}

enum Slot<'a> {
    Resolved(bool),
    Pending(&'a ConditionNode),
}

impl ConditionExpr {
    /// The empty expression which keeps every entity.
    #[must_use]
    pub fn always_true() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Evaluates the expression against one entity.
    ///
    /// # Errors
    /// Fails when an atomic condition compares incomparable operand types.
    pub fn evaluate<E: Entity>(
        &self,
        entity: &E,
        session: &mut Session,
    ) -> Result<bool, OperationError> {
        // Synthetic `true and` prefix: every group now sits behind a
        // connective, so both passes see uniform windows.
        let mut slots: Vec<Slot> = Vec::with_capacity(self.nodes.len() + 1);
        slots.push(Slot::Resolved(true));
        slots.extend(self.nodes.iter().map(Slot::Pending));

        let mut connectives = Vec::with_capacity(self.connectives.len() + 1);
        connectives.push(Connective::And);
        connectives.extend(self.connectives.iter().copied());

        // Pass 1: reduce every and-joined window left to right; or-joined
        // groups are carried over unresolved.
        let mut iter = slots.into_iter();
        let mut carried: Vec<Slot> = Vec::new();
        if let Some(first) = iter.next() {
            carried.push(first);
        }
        for (connective, slot) in connectives.into_iter().zip(iter) {
            match connective {
                Connective::And => {
                    let left = match carried.pop() {
                        Some(prev) => Self::resolve(prev, entity, session)?,
                        None => true,
                    };
                    let right = Self::resolve(slot, entity, session)?;
                    carried.push(Slot::Resolved(left && right));
                }
                Connective::Or => carried.push(slot),
            }
        }

        // Pass 2: fold the remaining or-joined groups left to right.
        let mut result = false;
        for slot in carried {
            let value = Self::resolve(slot, entity, session)?;
            result = result || value;
        }

        Ok(result)
    }

    fn resolve<E: Entity>(
        slot: Slot<'_>,
        entity: &E,
        session: &mut Session,
    ) -> Result<bool, OperationError> {
        match slot {
            Slot::Resolved(value) => Ok(value),
            Slot::Pending(ConditionNode::Atom(condition)) => {
                eval_condition(condition, entity, session)
            }
            Slot::Pending(ConditionNode::Group(expr)) => expr.evaluate(entity, session),
        }
    }
}

fn value_of<E: Entity>(
    operand: &Operand,
    entity: &E,
    session: &mut Session,
) -> Result<Value, OperationError> {
    match operand {
        Operand::Literal(value) => Ok(value.clone()),
        Operand::Field(field) => Ok(field.evaluate(entity, session)),
        Operand::Size(size) => Ok(size.evaluate(entity, session)),
        Operand::Pattern(_) | Operand::List(_) => Err(OperationError::Condition(
            "pattern/list operands are only valid on the right of like/in/between".into(),
        )),
    }
}

fn ordering_error(op: CondOp, left: &Value, right: &Value) -> OperationError {
    OperationError::Incomparable {
        operator: op.symbol(),
        left: left.type_name(),
        right: right.type_name(),
    }
}

fn eval_condition<E: Entity>(
    condition: &Condition,
    entity: &E,
    session: &mut Session,
) -> Result<bool, OperationError> {
    use std::cmp::Ordering;

    match condition.op {
        CondOp::Gt | CondOp::Ge | CondOp::Lt | CondOp::Le => {
            let left = value_of(&condition.left, entity, session)?;
            let right = value_of(&condition.right, entity, session)?;
            let ordering = left
                .try_cmp(&right)
                .ok_or_else(|| ordering_error(condition.op, &left, &right))?;
            Ok(match condition.op {
                CondOp::Gt => ordering == Ordering::Greater,
                CondOp::Ge => ordering != Ordering::Less,
                CondOp::Lt => ordering == Ordering::Less,
                _ => ordering != Ordering::Greater,
            })
        }
        CondOp::Eq => {
            let left = value_of(&condition.left, entity, session)?;
            let right = value_of(&condition.right, entity, session)?;
            Ok(left.eq_loose(&right))
        }
        CondOp::Ne => {
            let left = value_of(&condition.left, entity, session)?;
            let right = value_of(&condition.right, entity, session)?;
            Ok(!left.eq_loose(&right))
        }
        CondOp::Like => {
            let subject = value_of(&condition.left, entity, session)?;
            let Value::Str(subject) = subject else {
                return Err(OperationError::Incomparable {
                    operator: "like",
                    left: subject.type_name(),
                    right: "pattern",
                });
            };
            let Operand::Pattern(pattern) = &condition.right else {
                return Err(OperationError::Condition(
                    "the right operand of 'like' must be a pattern".into(),
                ));
            };
            Ok(pattern.is_match(&subject))
        }
        CondOp::In => {
            let needle = value_of(&condition.left, entity, session)?;
            let Operand::List(items) = &condition.right else {
                return Err(OperationError::Condition(
                    "the right operand of 'in' must be a tuple".into(),
                ));
            };
            for item in items {
                if needle.eq_loose(&value_of(item, entity, session)?) {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        CondOp::Between => {
            let subject = value_of(&condition.left, entity, session)?;
            let Operand::List(bounds) = &condition.right else {
                return Err(OperationError::Condition(
                    "the right operand of 'between' must be a two-element tuple".into(),
                ));
            };
            let low = value_of(&bounds[0], entity, session)?;
            let high = value_of(&bounds[1], entity, session)?;
            // Bounds are applied in the order given, never auto-sorted.
            let above_low = low
                .try_cmp(&subject)
                .ok_or_else(|| ordering_error(condition.op, &low, &subject))?
                != Ordering::Greater;
            let below_high = subject
                .try_cmp(&high)
                .ok_or_else(|| ordering_error(condition.op, &subject, &high))?
                != Ordering::Greater;
            Ok(above_low && below_high)
        }
    }
}

/// Parses the token stream of a `where` clause into a condition
/// expression.
///
/// # Errors
/// Fails on malformed syntax, unknown operators/fields/units, invalid
/// patterns and malformed date literals.
pub fn parse_expression(
    tokens: &[String],
    entity: EntityKind,
) -> Result<ConditionExpr, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::InvalidSyntax("empty 'where' clause".into()));
    }

    let mut nodes = Vec::new();
    let mut connectives = Vec::new();
    let mut group: Vec<&str> = Vec::new();

    for token in tokens {
        let connective = if token.eq_ignore_ascii_case("and") {
            Some(Connective::And)
        } else if token.eq_ignore_ascii_case("or") {
            Some(Connective::Or)
        } else {
            None
        };

        match connective {
            Some(connective) => {
                if group.is_empty() {
                    return Err(ParseError::InvalidSyntax(tokens.join(" ")));
                }
                nodes.push(parse_group(&group, entity)?);
                connectives.push(connective);
                group.clear();
            }
            None => group.push(token.as_str()),
        }
    }

    if group.is_empty() {
        return Err(ParseError::InvalidSyntax(tokens.join(" ")));
    }
    nodes.push(parse_group(&group, entity)?);

    Ok(ConditionExpr { nodes, connectives })
}

fn parse_group(group: &[&str], entity: EntityKind) -> Result<ConditionNode, ParseError> {
    // A lone parenthesized span is a nested sub-expression: re-tokenize
    // its interior and recurse.
    if group.len() == 1 && group[0].starts_with('(') && group[0].ends_with(')') {
        let inner = &group[0][1..group[0].len() - 1];
        let expr = parse_expression(&tokenize(inner)?, entity)?;
        return Ok(ConditionNode::Group(expr));
    }

    let parts: Vec<String> = if group.len() == 3 {
        group.iter().map(ToString::to_string).collect()
    } else {
        partition_fused(&group.concat())?
    };

    let op = CondOp::parse(&parts[1])
        .ok_or_else(|| ParseError::InvalidOperator(parts[1].clone()))?;

    let left = parse_operand(&parts[0], entity)?;
    let right = match op {
        CondOp::Like => parse_pattern(&parts[2])?,
        CondOp::In | CondOp::Between => parse_tuple(&parts[2], op, entity)?,
        _ => parse_operand(&parts[2], entity)?,
    };

    Ok(ConditionNode::Atom(Condition { left, op, right }))
}

/// Splits a fused clause like `size>=10` on its symbolic operator.
///
/// The clause is scanned left to right so the split lands on the first
/// operator, trying longer operators first at each position (`>=`
/// before `>`). Quoted spans are skipped, keeping literals like `'a>b'`
/// intact.
fn partition_fused(joined: &str) -> Result<Vec<String>, ParseError> {
    let mut quote: Option<char> = None;

    for (index, ch) in joined.char_indices() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        if ch == '\'' || ch == '"' {
            quote = Some(ch);
            continue;
        }

        for op in SYMBOLIC_OPERATORS {
            if joined[index..].starts_with(op) {
                let left = joined[..index].trim();
                let right = joined[index + op.len()..].trim();
                if left.is_empty() || right.is_empty() {
                    return Err(ParseError::InvalidSyntax(joined.to_string()));
                }
                return Ok(vec![left.to_string(), (*op).to_string(), right.to_string()]);
            }
        }
    }

    Err(ParseError::InvalidSyntax(joined.to_string()))
}

fn is_quoted(token: &str) -> bool {
    token.len() >= 2
        && ((token.starts_with('\'') && token.ends_with('\''))
            || (token.starts_with('"') && token.ends_with('"')))
}

fn parse_datetime_literal(source: &str) -> Result<NaiveDateTime, ParseError> {
    let parsed = if source.contains(' ') {
        NaiveDateTime::parse_from_str(source, "%Y-%m-%d %H:%M:%S")
    } else {
        NaiveDate::parse_from_str(source, "%Y-%m-%d").map(|date| date.and_time(NaiveTime::MIN))
    };
    parsed.map_err(|_| ParseError::InvalidDate(source.to_string()))
}

/// Parses a comparison operand: literal, field or size reference.
pub fn parse_operand(token: &str, entity: EntityKind) -> Result<Operand, ParseError> {
    if token.starts_with('(') {
        return Err(ParseError::InvalidSyntax(token.to_string()));
    }

    if is_quoted(token) {
        let inner = &token[1..token.len() - 1];
        if DATETIME_PATTERN.is_match(inner) {
            return Ok(Operand::Literal(Value::DateTime(parse_datetime_literal(
                inner,
            )?)));
        }
        return Ok(Operand::Literal(Value::Str(inner.to_string())));
    }

    if INT_PATTERN.is_match(token) {
        let value = token
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidSyntax(token.to_string()))?;
        return Ok(Operand::Literal(Value::Int(value)));
    }

    if FLOAT_PATTERN.is_match(token) {
        let value = token
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidSyntax(token.to_string()))?;
        return Ok(Operand::Literal(Value::Float(value)));
    }

    if token.eq_ignore_ascii_case("true") {
        return Ok(Operand::Literal(Value::Bool(true)));
    }
    if token.eq_ignore_ascii_case("false") {
        return Ok(Operand::Literal(Value::Bool(false)));
    }
    if token.eq_ignore_ascii_case("none") {
        return Ok(Operand::Literal(Value::None));
    }

    let (name, unit) = split_qualified(token)?;
    if name.eq_ignore_ascii_case("size") {
        if !entity.has_size() {
            return Err(ParseError::InvalidField(token.to_string()));
        }
        return Ok(Operand::Size(SizeField::parse(unit)?));
    }
    if !unit.is_empty() {
        // Only the size field takes a bracketed argument.
        return Err(ParseError::InvalidField(token.to_string()));
    }

    Ok(Operand::Field(Field::parse(name, entity)?))
}

fn parse_pattern(token: &str) -> Result<Operand, ParseError> {
    if !is_quoted(token) {
        return Err(ParseError::InvalidPattern(token.to_string()));
    }
    let inner = &token[1..token.len() - 1];
    // Anchor at the start: `like` matches from the beginning of the value.
    let regex = Regex::new(&format!(r"\A(?:{inner})"))
        .map_err(|_| ParseError::InvalidPattern(inner.to_string()))?;
    Ok(Operand::Pattern(regex))
}

fn parse_tuple(token: &str, op: CondOp, entity: EntityKind) -> Result<Operand, ParseError> {
    if !(token.starts_with('(') && token.ends_with(')')) {
        return Err(ParseError::InvalidSyntax(format!(
            "the right operand of '{}' must be a parenthesized tuple, found {token}",
            op.symbol()
        )));
    }

    let items = split_list(&token[1..token.len() - 1])?
        .into_iter()
        .filter(|item| !item.is_empty())
        .map(|item| parse_operand(&item, entity))
        .collect::<Result<Vec<_>, _>>()?;

    if op == CondOp::Between && items.len() != 2 {
        return Err(ParseError::BetweenArity(items.len()));
    }

    Ok(Operand::List(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::DataLine;
    use std::path::PathBuf;

    /// Atomic condition standing in for a plain boolean literal.
    fn lit(value: bool) -> ConditionNode {
        ConditionNode::Atom(Condition {
            left: Operand::Literal(Value::Bool(value)),
            op: CondOp::Eq,
            right: Operand::Literal(Value::Bool(true)),
        })
    }

    fn expr(values: &[bool], connectives: &[Connective]) -> ConditionExpr {
        ConditionExpr {
            nodes: values.iter().copied().map(lit).collect(),
            connectives: connectives.to_vec(),
        }
    }

    fn dummy() -> DataLine {
        DataLine::new(PathBuf::from("dummy.txt"), 1, "dummy".into())
    }

    fn eval(expr: &ConditionExpr) -> bool {
        expr.evaluate(&dummy(), &mut Session::new()).unwrap()
    }

    fn parse(clause: &str, entity: EntityKind) -> Result<ConditionExpr, ParseError> {
        parse_expression(&tokenize(clause).unwrap(), entity)
    }

    #[test]
    fn test_empty_expression_is_always_true() {
        assert!(eval(&ConditionExpr::always_true()));
    }

    #[test]
    fn test_all_and_is_logical_and() {
        for (a, b, c) in truth_triples() {
            let e = expr(&[a, b, c], &[Connective::And, Connective::And]);
            assert_eq!(eval(&e), a && b && c);
        }
    }

    #[test]
    fn test_all_or_is_logical_or() {
        for (a, b, c) in truth_triples() {
            let e = expr(&[a, b, c], &[Connective::Or, Connective::Or]);
            assert_eq!(eval(&e), a || b || c);
        }
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        for (a, b, c) in truth_triples() {
            let left = expr(&[a, b, c], &[Connective::And, Connective::Or]);
            assert_eq!(eval(&left), (a && b) || c, "{a} and {b} or {c}");

            let right = expr(&[a, b, c], &[Connective::Or, Connective::And]);
            assert_eq!(eval(&right), a || (b && c), "{a} or {b} and {c}");
        }
    }

    #[test]
    fn test_parenthesized_group_overrides_precedence() {
        // (a or b) and c vs a or b and c at a=true, b=false, c=false.
        let grouped = ConditionExpr {
            nodes: vec![
                ConditionNode::Group(expr(&[true, false], &[Connective::Or])),
                lit(false),
            ],
            connectives: vec![Connective::And],
        };
        let flat = expr(&[true, false, false], &[Connective::Or, Connective::And]);
        assert!(!eval(&grouped));
        assert!(eval(&flat));
    }

    fn truth_triples() -> impl Iterator<Item = (bool, bool, bool)> {
        (0..8u8).map(|n| (n & 1 != 0, n & 2 != 0, n & 4 != 0))
    }

    #[test]
    fn test_parse_atomic_condition() {
        let e = parse("name = 'a.txt'", EntityKind::File).unwrap();
        assert!(eval_on_line(&e, "a.txt"));
    }

    fn eval_on_line(expr: &ConditionExpr, name: &str) -> bool {
        let line = DataLine::new(PathBuf::from(name), 1, "content".into());
        expr.evaluate(&line, &mut Session::new()).unwrap()
    }

    #[test]
    fn test_parse_nested_expression() {
        let e = parse(
            "(lineno = 1 or lineno = 2) and name = 'dummy.txt'",
            EntityKind::Data,
        )
        .unwrap();
        assert!(e
            .evaluate(&dummy(), &mut Session::new())
            .unwrap());
    }

    #[test]
    fn test_fused_symbolic_operator_splits() {
        let e = parse("lineno>=1", EntityKind::Data).unwrap();
        assert!(e.evaluate(&dummy(), &mut Session::new()).unwrap());
    }

    #[test]
    fn test_fused_split_skips_quoted_literals() {
        // An operator character inside the literal is not a split point;
        // the fused and spaced spellings parse identically.
        let mut session = Session::new();
        let line = DataLine::new(PathBuf::from("a>b"), 1, String::new());

        let fused = parse("name='a>b'", EntityKind::Data).unwrap();
        assert!(fused.evaluate(&line, &mut session).unwrap());

        let spaced = parse("name = 'a>b'", EntityKind::Data).unwrap();
        assert!(spaced.evaluate(&line, &mut session).unwrap());
        assert!(!fused.evaluate(&dummy(), &mut session).unwrap());

        let bang = parse("name!='a=b'", EntityKind::Data).unwrap();
        assert!(bang.evaluate(&line, &mut session).unwrap());
    }

    #[test]
    fn test_fused_split_is_leftmost() {
        // With several operators present the split lands on the first
        // one, so diagnostics name the right-hand remainder.
        let err = parse("name<b>=c", EntityKind::Data).unwrap_err();
        assert!(err.to_string().contains("b>=c"));
    }

    #[test]
    fn test_like_matches_from_start() {
        let e = parse("dataline like 'dum.*'", EntityKind::Data).unwrap();
        assert!(e.evaluate(&dummy(), &mut Session::new()).unwrap());

        // A mid-string match is not a match.
        let miss = parse("dataline like 'ummy'", EntityKind::Data).unwrap();
        assert!(!miss.evaluate(&dummy(), &mut Session::new()).unwrap());
    }

    #[test]
    fn test_in_membership() {
        let e = parse("lineno in (1, 2, 3)", EntityKind::Data).unwrap();
        assert!(e.evaluate(&dummy(), &mut Session::new()).unwrap());

        let miss = parse("lineno in (7, 8)", EntityKind::Data).unwrap();
        assert!(!miss.evaluate(&dummy(), &mut Session::new()).unwrap());
    }

    #[test]
    fn test_between_is_inclusive_and_order_sensitive() {
        let mut session = Session::new();
        let at_low = parse("lineno between (1, 3)", EntityKind::Data).unwrap();
        assert!(at_low.evaluate(&dummy(), &mut session).unwrap());

        let line3 = DataLine::new(PathBuf::from("x"), 3, String::new());
        assert!(at_low.evaluate(&line3, &mut session).unwrap());

        // Swapped bounds are never auto-corrected.
        let swapped = parse("lineno between (3, 1)", EntityKind::Data).unwrap();
        let line2 = DataLine::new(PathBuf::from("x"), 2, String::new());
        assert!(!swapped.evaluate(&line2, &mut session).unwrap());
        assert!(!swapped.evaluate(&line3, &mut session).unwrap());
    }

    #[test]
    fn test_between_requires_two_elements() {
        let err = parse("lineno between (1, 2, 3)", EntityKind::Data).unwrap_err();
        assert!(matches!(err, ParseError::BetweenArity(3)));
    }

    #[test]
    fn test_datetime_literal_parsing() {
        let e = parse("mtime > '2020-01-05'", EntityKind::File).unwrap();
        assert!(!e.is_empty());

        let err = parse("mtime > '2020-13-40'", EntityKind::File).unwrap_err();
        assert!(matches!(err, ParseError::InvalidDate(_)));
    }

    #[test]
    fn test_unknown_field_in_condition_is_fatal() {
        let err = parse("bogus = 1", EntityKind::File).unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_size_operand_only_for_sized_entities() {
        assert!(parse("size > 10", EntityKind::File).is_ok());
        assert!(parse("size > 10", EntityKind::Dir).is_err());
    }

    #[test]
    fn test_incomparable_ordering_is_an_operation_error() {
        let e = parse("name > 5", EntityKind::Data).unwrap();
        let err = e.evaluate(&dummy(), &mut Session::new()).unwrap_err();
        assert!(matches!(err, OperationError::Incomparable { .. }));
    }

    #[test]
    fn test_mismatched_equality_is_simply_false() {
        let e = parse("name = 5", EntityKind::Data).unwrap();
        assert!(!e.evaluate(&dummy(), &mut Session::new()).unwrap());
    }

    #[test]
    fn test_none_literal_comparison() {
        let e = parse("size = none", EntityKind::File).unwrap();
        // A nonexistent file has no readable size.
        let ghost = crate::entities::FileEntity::new(PathBuf::from("/no/such/file"));
        assert!(e.evaluate(&ghost, &mut Session::new()).unwrap());
    }
}
