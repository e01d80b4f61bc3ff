//! Error types for shroud.

use thiserror::Error;

/// The main error type for view generation.
///
/// Unconfigured tables and columns are never errors: they fall back to
/// pass-through and do not show up here.
#[derive(Debug, Error)]
pub enum ShroudError {
    /// The list-views query failed or a row failed to decode.
    #[error("Failed to select views: {0}")]
    ListViews(#[source] sqlx::Error),

    /// The list-tables query failed or a row failed to decode.
    #[error("Failed to select tables: {0}")]
    ListTables(#[source] sqlx::Error),

    /// The list-columns query failed for one table.
    #[error("Failed to select columns of table '{table}': {source}")]
    ListColumns {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    /// A `DROP VIEW` statement failed.
    #[error("Failed to drop view '{view}': {source}")]
    DropView {
        view: String,
        #[source]
        source: sqlx::Error,
    },

    /// A `CREATE OR REPLACE VIEW` statement failed.
    #[error("Failed to create view '{view}': {source}")]
    CreateView {
        view: String,
        #[source]
        source: sqlx::Error,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShroudError {
    /// Whether a schema introspection query failed.
    pub fn is_introspection(&self) -> bool {
        matches!(
            self,
            Self::ListViews(_) | Self::ListTables(_) | Self::ListColumns { .. }
        )
    }

    /// Whether a view DDL statement failed.
    pub fn is_ddl(&self) -> bool {
        matches!(self, Self::DropView { .. } | Self::CreateView { .. })
    }
}

/// Result type alias for shroud operations.
pub type ShroudResult<T> = Result<T, ShroudError>;
