//! Conditional dispatch between transforms.
//!
//! [`Condition`] renders a `CASE` expression: each [`When`] compares a
//! column of the same row against a literal and selects a nested
//! transform; the default transform covers the `ELSE` branch.

use crate::error::ShroudError;
use crate::transform::{Transform, full_column_name, quote_literal};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a [`When`] branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    NotLike,
    ILike,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::ILike => "ILIKE",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Operator {
    type Err = ShroudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "=" | "==" => Ok(Operator::Eq),
            "<>" | "!=" => Ok(Operator::Ne),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Gte),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Lte),
            "LIKE" => Ok(Operator::Like),
            "NOT LIKE" => Ok(Operator::NotLike),
            "ILIKE" => Ok(Operator::ILike),
            other => Err(ShroudError::Config(format!("Invalid operator: '{}'", other))),
        }
    }
}

impl TryFrom<String> for Operator {
    type Error = ShroudError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_sql().to_string()
    }
}

/// One `WHEN ... THEN ...` branch.
#[derive(Debug)]
pub struct When {
    column: String,
    operator: Operator,
    value: String,
    data_type: String,
    transform: Box<dyn Transform>,
}

impl When {
    /// Apply `transform` to rows where `column <operator> value`, both
    /// sides cast to `data_type`.
    pub fn new(
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<String>,
        data_type: impl Into<String>,
        transform: impl Transform + 'static,
    ) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
            data_type: data_type.into(),
            transform: Box::new(transform),
        }
    }

    fn emit_case(&self, table: &str, column: &str) -> String {
        format!(
            "WHEN {} {} '{}'::{} THEN ({})",
            apply_type(&full_column_name(table, &self.column), &self.data_type),
            self.operator,
            quote_literal(&self.value),
            self.data_type,
            self.transform.emit(table, column)
        )
    }
}

fn apply_type(partial: &str, data_type: &str) -> String {
    format!("(({})::{})", partial, data_type)
}

/// Pick a transform per row from ordered conditions, first match wins.
#[derive(Debug)]
pub struct Condition {
    data_type: String,
    default: Box<dyn Transform>,
    conditions: Vec<When>,
}

impl Condition {
    /// `data_type` is the cast applied to the whole `CASE`.
    pub fn new(
        data_type: impl Into<String>,
        default: impl Transform + 'static,
        conditions: Vec<When>,
    ) -> Self {
        Self {
            data_type: data_type.into(),
            default: Box::new(default),
            conditions,
        }
    }

    /// Append a branch after the existing ones.
    pub fn when(mut self, condition: When) -> Self {
        self.conditions.push(condition);
        self
    }
}

impl Transform for Condition {
    fn emit(&self, table: &str, column: &str) -> String {
        let default = self.default.emit(table, column);

        if self.conditions.is_empty() {
            return default;
        }

        let cases: Vec<String> = self
            .conditions
            .iter()
            .map(|c| c.emit_case(table, column))
            .collect();

        format!(
            "(CASE {} ELSE {} END)::{}",
            cases.join(" "),
            default,
            self.data_type
        )
    }
}
