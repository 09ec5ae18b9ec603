//! Predicate building for WHERE and HAVING clauses.
//!
//! This module provides [`Op`] (operator keyword), [`Operand`] (the data an
//! operator consumes) and [`Predicate`], which renders a
//! `(column, operator, data)` triple into a SQL boolean fragment with values
//! quoted by a [`Dialect`]. [`Condition`] is the simpler driver-level form
//! (raw SQL, or a column/operator/value triple rendered verbatim) used by
//! HAVING and by UPDATE/DELETE helpers.

use crate::dialect::Dialect;
use crate::error::{DbalError, DbalResult};
use crate::ident::is_expression;
use crate::value::Value;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// One or two characters from `= ! < >`.
static COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[=!<>]{1,2}$").expect("comparison operator pattern is valid")
});

/// Query operator for building predicates.
///
/// Parsed case-insensitively; keyword operators are rendered upper case.
///
/// # Example
/// ```ignore
/// use sqlbridge::Op;
///
/// let op: Op = ">=".parse()?;
/// let op: Op = "not like".parse()?;
/// assert_eq!(op.as_str(), "NOT LIKE");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// `=`, `!=`, `<`, `>`, `<=`, `>=`, `<>`: one scalar operand.
    Compare(String),
    /// EXISTS (no operand)
    Exists,
    /// NOT EXISTS (no operand)
    NotExists,
    /// IS NULL (no operand)
    IsNull,
    /// IS NOT NULL (no operand)
    IsNotNull,
    /// LIKE pattern match, wrapped in `%` unless it already has one
    Like,
    /// NOT LIKE pattern match
    NotLike,
    /// BETWEEN a AND b
    Between,
    /// NOT BETWEEN a AND b
    NotBetween,
    /// IN (list)
    In,
    /// NOT IN (list)
    NotIn,
}

impl Op {
    pub fn as_str(&self) -> &str {
        match self {
            Op::Compare(sym) => sym,
            Op::Exists => "EXISTS",
            Op::NotExists => "NOT EXISTS",
            Op::IsNull => "IS NULL",
            Op::IsNotNull => "IS NOT NULL",
            Op::Like => "LIKE",
            Op::NotLike => "NOT LIKE",
            Op::Between => "BETWEEN",
            Op::NotBetween => "NOT BETWEEN",
            Op::In => "IN",
            Op::NotIn => "NOT IN",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Op {
    type Err = DbalError;

    fn from_str(s: &str) -> DbalResult<Self> {
        let s = s.trim();
        if COMPARISON.is_match(s) {
            return Ok(Op::Compare(s.to_string()));
        }
        match s.to_ascii_uppercase().as_str() {
            "EXISTS" => Ok(Op::Exists),
            "NOT EXISTS" => Ok(Op::NotExists),
            "IS NULL" => Ok(Op::IsNull),
            "IS NOT NULL" => Ok(Op::IsNotNull),
            "LIKE" => Ok(Op::Like),
            "NOT LIKE" => Ok(Op::NotLike),
            "BETWEEN" => Ok(Op::Between),
            "NOT BETWEEN" => Ok(Op::NotBetween),
            "IN" => Ok(Op::In),
            "NOT IN" => Ok(Op::NotIn),
            _ => Err(DbalError::invalid_spec(format!(
                "invalid expression argument '{s}'"
            ))),
        }
    }
}

/// The data an operator consumes.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Operand {
    #[default]
    None,
    Scalar(Value),
    List(Vec<Value>),
}

impl From<()> for Operand {
    fn from(_: ()) -> Self {
        Operand::None
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Scalar(v)
    }
}

macro_rules! impl_scalar_operand {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand::Scalar(Value::from(v))
                }
            }
        )*
    };
}

impl_scalar_operand!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, &str, String, &String);

impl<T: Into<Value>> From<Vec<T>> for Operand {
    fn from(v: Vec<T>) -> Self {
        Operand::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Operand {
    fn from(v: [T; N]) -> Self {
        Operand::List(v.into_iter().map(Into::into).collect())
    }
}

/// Boolean connective joining a fragment to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connective {
    #[default]
    And,
    Or,
}

impl Connective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

impl AsRef<str> for Connective {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Connective {
    type Err = DbalError;

    fn from_str(s: &str) -> DbalResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Connective::And),
            "OR" => Ok(Connective::Or),
            _ => Err(DbalError::invalid_spec(format!(
                "invalid connective '{s}', must be 'AND' or 'OR'"
            ))),
        }
    }
}

/// A validated `(column, operator, data)` predicate.
///
/// The operand shape is checked against the operator when the predicate is
/// created, so rendering cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    column: String,
    op: Op,
    operand: Operand,
}

impl Predicate {
    pub fn new(
        column: impl Into<String>,
        op: impl AsRef<str>,
        operand: impl Into<Operand>,
    ) -> DbalResult<Self> {
        let op: Op = op.as_ref().parse()?;
        let operand = operand.into();

        let shape_ok = match (&op, &operand) {
            (Op::Compare(_) | Op::Like | Op::NotLike, Operand::Scalar(_)) => true,
            (Op::Compare(_), _) => {
                return Err(DbalError::invalid_spec(format!(
                    "invalid expression argument '{op}': comparison needs a single value"
                )));
            }
            (Op::Exists | Op::NotExists | Op::IsNull | Op::IsNotNull, _) => true,
            (Op::Between | Op::NotBetween, Operand::List(vals)) => vals.len() == 2,
            (Op::In | Op::NotIn, Operand::List(vals)) => !vals.is_empty(),
            _ => false,
        };
        if !shape_ok {
            let expected = match op {
                Op::Like | Op::NotLike => "a single value",
                Op::Between | Op::NotBetween => "exactly two values",
                _ => "a non-empty list of values",
            };
            return Err(DbalError::invalid_spec(format!(
                "operator '{op}' expects {expected}"
            )));
        }

        Ok(Self {
            column: column.into(),
            op,
            operand,
        })
    }

    pub fn op(&self) -> &Op {
        &self.op
    }

    /// Render the predicate, quoting the column and data via `dialect`.
    pub fn to_sql(&self, dialect: &dyn Dialect) -> String {
        let col = if is_expression(&self.column) {
            self.column.clone()
        } else {
            dialect.quote_identifier(&self.column)
        };
        let op = self.op.as_str();

        match (&self.op, &self.operand) {
            (Op::Compare(_), Operand::Scalar(v)) => format!("{col} {op} {}", dialect.quote(v)),
            (Op::Like | Op::NotLike, Operand::Scalar(v)) => {
                let pattern = v.to_plain_string();
                let pattern = if pattern.contains('%') {
                    pattern
                } else {
                    format!("%{pattern}%")
                };
                format!("{col} {op} {}", dialect.quote_text(&pattern))
            }
            (Op::Between | Op::NotBetween, Operand::List(vals)) => format!(
                "{col} {op} {} AND {}",
                dialect.quote(&vals[0]),
                dialect.quote(&vals[1])
            ),
            (Op::In | Op::NotIn, Operand::List(vals)) => {
                let list: Vec<String> = vals.iter().map(|v| dialect.quote(v)).collect();
                format!("{col} {op}({})", list.join(", "))
            }
            _ => format!("{col} {op}"),
        }
    }
}

/// A driver-level condition: raw SQL, or a simple triple.
///
/// The triple form quotes the column (unless it is an expression) and the
/// value (unless it is NULL, in which case it is left out) and joins them
/// with the operator exactly as given.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Raw(String),
    Simple {
        column: String,
        op: String,
        value: Value,
    },
}

impl Condition {
    pub fn raw(sql: impl Into<String>) -> Self {
        Condition::Raw(sql.into())
    }

    pub fn simple(column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Simple {
            column: column.into(),
            op: op.into(),
            value: value.into(),
        }
    }

    /// Returns `true` for an empty raw condition.
    pub fn is_empty(&self) -> bool {
        matches!(self, Condition::Raw(s) if s.trim().is_empty())
    }

    pub fn to_sql(&self, dialect: &dyn Dialect) -> String {
        match self {
            Condition::Raw(sql) => sql.clone(),
            Condition::Simple { column, op, value } => {
                let col = if is_expression(column) {
                    column.clone()
                } else {
                    dialect.quote_identifier(column)
                };
                if value.is_null() {
                    format!("{col} {op}")
                } else {
                    format!("{col} {op} {}", dialect.quote(value))
                }
            }
        }
    }
}

impl From<&str> for Condition {
    fn from(sql: &str) -> Self {
        Condition::Raw(sql.to_string())
    }
}

impl From<String> for Condition {
    fn from(sql: String) -> Self {
        Condition::Raw(sql)
    }
}

impl<V: Into<Value>> From<(&str, &str, V)> for Condition {
    fn from((column, op, value): (&str, &str, V)) -> Self {
        Condition::simple(column, op, value)
    }
}
