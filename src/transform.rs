//! Column transforms.
//!
//! A [`Transform`] turns a `(table, column)` pair into the SQL expression
//! that replaces the column in the anonymized view. Dialect-independent
//! transforms live here; PostgreSQL-specific ones live in
//! [`crate::postgres`].

use std::fmt::Debug;

/// Builds the SQL expression that anonymizes one column.
///
/// Implementations must be pure: the same instance called with the same
/// names always returns the same text.
pub trait Transform: Debug + Send + Sync {
    /// Emit the expression selecting the transformed value of `table.column`.
    fn emit(&self, table: &str, column: &str) -> String;
}

/// Qualified column reference, `table.column`.
pub fn full_column_name(table: &str, column: &str) -> String {
    format!("{}.{}", table, column)
}

/// Escape text for embedding between single quotes.
///
/// Doubles every `'`. Text without quotes is returned unchanged.
pub fn quote_literal(text: &str) -> String {
    text.replace('\'', "''")
}

/// Pass-through: the column value as is.
///
/// Every column without a configured transform resolves to this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Noop;

impl Transform for Noop {
    fn emit(&self, table: &str, column: &str) -> String {
        full_column_name(table, column)
    }
}

/// Replace every row value with the same typed literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Static {
    value: String,
    data_type: String,
}

impl Static {
    /// `data_type` is embedded verbatim as the cast target.
    pub fn new(value: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            data_type: data_type.into(),
        }
    }
}

impl Transform for Static {
    fn emit(&self, _table: &str, _column: &str) -> String {
        format!("'{}'::{}", quote_literal(&self.value), self.data_type)
    }
}

impl<T: Transform + ?Sized> Transform for Box<T> {
    fn emit(&self, table: &str, column: &str) -> String {
        (**self).emit(table, column)
    }
}
