//! Per-table column registry.

use crate::transform::{Noop, Transform};
use std::collections::BTreeMap;

/// Column-to-transform mapping for one table.
///
/// Built once through [`TableBuilder`] and read-only afterwards.
#[derive(Debug, Default)]
pub struct Table {
    columns: BTreeMap<String, Box<dyn Transform>>,
}

impl Table {
    /// A table with no configured columns. Everything passes through.
    pub const fn empty() -> Self {
        Self {
            columns: BTreeMap::new(),
        }
    }

    /// Start configuring a table.
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    /// The transform configured for `column`, or pass-through if none is.
    pub fn resolve(&self, column: &str) -> &dyn Transform {
        match self.columns.get(column) {
            Some(transform) => transform.as_ref(),
            None => &Noop,
        }
    }

    /// Whether `column` has an explicit transform.
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Number of configured columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Configured column names, sorted.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

/// Builder for [`Table`].
#[derive(Debug, Default)]
pub struct TableBuilder {
    columns: BTreeMap<String, Box<dyn Transform>>,
}

impl TableBuilder {
    /// Set the transform for a column. A later call for the same column wins.
    pub fn transform(mut self, column: impl Into<String>, transform: impl Transform + 'static) -> Self {
        self.columns.insert(column.into(), Box::new(transform));
        self
    }

    /// Same as [`TableBuilder::transform`] for an already boxed transform.
    pub fn boxed(mut self, column: impl Into<String>, transform: Box<dyn Transform>) -> Self {
        self.columns.insert(column.into(), transform);
        self
    }

    /// Freeze the configuration.
    pub fn build(self) -> Table {
        Table {
            columns: self.columns,
        }
    }
}
