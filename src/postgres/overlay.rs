use crate::transform::{Transform, full_column_name, quote_literal};

/// Overlay part of a text value with a repeated pattern.
///
/// `count` repetitions of `unit` replace the same number of characters,
/// starting at the 1-based position `start`. Characters before and after
/// the window are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    unit: String,
    start: u32,
    count: usize,
}

impl Overlay {
    pub fn new(unit: impl Into<String>, start: u32, count: usize) -> Self {
        Self {
            unit: unit.into(),
            start,
            count,
        }
    }

    /// The string written over the window.
    pub fn overlay(&self) -> String {
        self.unit.repeat(self.count)
    }
}

impl Transform for Overlay {
    fn emit(&self, table: &str, column: &str) -> String {
        // overlay() without FOR replaces as many characters as the placing string has
        format!(
            r#""overlay"(({})::text, '{}'::text, {})"#,
            full_column_name(table, column),
            quote_literal(&self.overlay()),
            self.start
        )
    }
}
