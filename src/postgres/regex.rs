use crate::transform::{Transform, full_column_name, quote_literal};

/// Replace the first match of a POSIX regular expression.
///
/// Pattern and replacement are embedded as string literals; only single
/// quotes are escaped, so backslash sequences reach PostgreSQL untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexReplace {
    pattern: String,
    replacement: String,
}

impl RegexReplace {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

impl Transform for RegexReplace {
    fn emit(&self, table: &str, column: &str) -> String {
        format!(
            "REGEXP_REPLACE({}, '{}', '{}')",
            full_column_name(table, column),
            quote_literal(&self.pattern),
            quote_literal(&self.replacement)
        )
    }
}
