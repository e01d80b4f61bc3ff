use crate::transform::{Transform, full_column_name, quote_literal};

/// Drop top-level keys from a JSON object column.
///
/// Remaining keys keep their order and values. Removing every key yields
/// `{}`. With no keys configured the object is rebuilt unchanged.
///
/// A NULL column also yields `{}`, not NULL: `json_each` produces no rows
/// and `concat` skips the NULL aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveJsonKeys {
    keys: Vec<String>,
}

impl RemoveJsonKeys {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    fn filter(&self) -> String {
        if self.keys.is_empty() {
            return "TRUE".to_string();
        }
        let removed: Vec<String> = self
            .keys
            .iter()
            .map(|key| format!("key <> '{}'", quote_literal(key)))
            .collect();
        removed.join(" AND ")
    }
}

impl Transform for RemoveJsonKeys {
    fn emit(&self, table: &str, column: &str) -> String {
        // string_agg over zero rows is NULL, which concat() skips: '{}'
        format!(
            "(SELECT concat('{{', string_agg(to_json(\"key\") || ':' || \"value\", ','), '}}')::JSON \
             FROM json_each({}::JSON) WHERE {})",
            full_column_name(table, column),
            self.filter()
        )
    }
}
