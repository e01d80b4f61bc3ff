use crate::transform::Transform;

/// Overwrite every value with `NULL`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Null;

impl Transform for Null {
    fn emit(&self, _table: &str, _column: &str) -> String {
        "NULL::unknown".to_string()
    }
}
