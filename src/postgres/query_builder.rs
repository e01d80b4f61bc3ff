use crate::generator::QueryBuilder;

/// [`QueryBuilder`] for PostgreSQL.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresQueryBuilder;

impl PostgresQueryBuilder {
    pub fn new() -> Self {
        Self
    }
}

// Compares the name tail literally: no LIKE, so `_` and `%` in a suffix match themselves
const LIST_VIEWS_QUERY: &str = "SELECT viewname::text \
    FROM pg_catalog.pg_views \
    WHERE schemaname = CURRENT_SCHEMA \
    AND lower(right(viewname::text, length($1) + 1)) = lower('_' || $1) \
    ORDER BY viewname ASC";

const LIST_TABLES_QUERY: &str = "SELECT tablename::text \
    FROM pg_catalog.pg_tables \
    WHERE schemaname = CURRENT_SCHEMA \
    ORDER BY tablename ASC";

const LIST_COLUMNS_QUERY: &str = "SELECT column_name::text \
    FROM information_schema.columns \
    WHERE table_schema = CURRENT_SCHEMA AND table_name = $1 \
    ORDER BY ordinal_position ASC";

impl QueryBuilder for PostgresQueryBuilder {
    fn list_views_query(&self) -> &str {
        LIST_VIEWS_QUERY
    }

    fn drop_view_query(&self, view: &str) -> String {
        format!("DROP VIEW IF EXISTS {}", view)
    }

    fn list_tables_query(&self) -> &str {
        LIST_TABLES_QUERY
    }

    fn list_columns_query(&self) -> &str {
        LIST_COLUMNS_QUERY
    }

    fn create_view_query(&self, view: &str, table: &str, columns: &[String]) -> String {
        format!(
            "CREATE OR REPLACE VIEW {} AS SELECT {} FROM {}",
            view,
            columns.join(", "),
            table
        )
    }
}
