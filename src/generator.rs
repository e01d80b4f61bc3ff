//! View generation.
//!
//! [`Generator`] introspects the live schema and keeps one anonymized view
//! per table in sync with it:
//!
//! - [`Generator::clear_views`] drops every view carrying the suffix.
//! - [`Generator::create_views`] creates or replaces `<table>_<suffix>` for
//!   every table, each column going through its configured transform.
//!
//! Both stop at the first failure. Statements that already ran stay
//! committed; rerun after fixing the cause.

use crate::engine::SchemaExecutor;
use crate::error::{ShroudError, ShroudResult};
use crate::table::Table;
use crate::transform::Transform;

use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Debug;

/// Suffix appended to table names when none is configured.
pub const DEFAULT_VIEW_SUFFIX: &str = "anonymized";

static EMPTY_TABLE: Table = Table::empty();

/// Dialect-specific SQL the generator needs.
pub trait QueryBuilder: Debug + Send + Sync {
    /// Names of existing generated views, ordered by name. `$1` is the suffix.
    fn list_views_query(&self) -> &str;

    /// Statement dropping the named view if it exists.
    fn drop_view_query(&self, view: &str) -> String;

    /// Names of the tables in the working schema, ordered by name.
    fn list_tables_query(&self) -> &str;

    /// Column names of table `$1`, ordered by position.
    fn list_columns_query(&self) -> &str;

    /// Statement creating or replacing `view` as a select of `columns`
    /// (already aliased fragments) from `table`.
    fn create_view_query(&self, view: &str, table: &str, columns: &[String]) -> String;
}

/// The statement that would create one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewPlan {
    pub table: String,
    pub view: String,
    pub sql: String,
}

/// Orchestrates clearing and creating the anonymized views.
#[derive(Debug)]
pub struct Generator {
    query_builder: Box<dyn QueryBuilder>,
    tables: HashMap<String, Table>,
    view_suffix: String,
}

impl Generator {
    /// Start configuring a generator for the given dialect.
    pub fn builder(query_builder: impl QueryBuilder + 'static) -> GeneratorBuilder {
        GeneratorBuilder {
            query_builder: Box::new(query_builder),
            tables: HashMap::new(),
            view_suffix: DEFAULT_VIEW_SUFFIX.to_string(),
        }
    }

    pub fn view_suffix(&self) -> &str {
        &self.view_suffix
    }

    /// Configuration of a table. Unconfigured tables get an empty one.
    pub fn table(&self, name: &str) -> &Table {
        self.tables.get(name).unwrap_or(&EMPTY_TABLE)
    }

    /// Configured table names, sorted.
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// `<table>_<suffix>`.
    pub fn view_name(&self, table: &str) -> String {
        format!("{}_{}", table, self.view_suffix)
    }

    /// One `<expression> AS <column>` per live column, in column order.
    ///
    /// Configured columns missing from `columns` are ignored.
    pub fn column_fragments(&self, table: &str, columns: &[String]) -> Vec<String> {
        let config = self.table(table);
        columns
            .iter()
            .map(|column| {
                let transform: &dyn Transform = config.resolve(column);
                format!("{} AS {}", transform.emit(table, column), column)
            })
            .collect()
    }

    /// Drop every existing view carrying the suffix.
    ///
    /// Returns the number of views dropped.
    pub async fn clear_views<E>(&self, db: &E) -> ShroudResult<usize>
    where
        E: SchemaExecutor + ?Sized,
    {
        // an empty suffix would match every view whose name ends in `_`
        if self.view_suffix.is_empty() {
            return Err(ShroudError::Config(
                "Refusing to clear views with an empty view suffix".to_string(),
            ));
        }

        let views = db
            .fetch_names(self.query_builder.list_views_query(), Some(self.view_suffix.as_str()))
            .await
            .map_err(ShroudError::ListViews)?;

        for view in &views {
            let sql = self.query_builder.drop_view_query(view);
            tracing::debug!("Dropping view '{}'", view);
            if let Err(source) = db.execute(&sql).await {
                tracing::warn!("Failed to drop view '{}': {}", view, source);
                return Err(ShroudError::DropView {
                    view: view.clone(),
                    source,
                });
            }
        }

        tracing::info!("Dropped {} view(s) with suffix '{}'", views.len(), self.view_suffix);
        Ok(views.len())
    }

    /// Create or replace the view of every table in the working schema.
    ///
    /// Returns the number of views created.
    pub async fn create_views<E>(&self, db: &E) -> ShroudResult<usize>
    where
        E: SchemaExecutor + ?Sized,
    {
        let tables = self.list_tables(db).await?;

        for table in &tables {
            let plan = self.plan_view(db, table).await?;
            tracing::debug!("Creating view '{}': {}", plan.view, plan.sql);
            if let Err(source) = db.execute(&plan.sql).await {
                tracing::warn!("Failed to create view '{}': {}", plan.view, source);
                return Err(ShroudError::CreateView {
                    view: plan.view,
                    source,
                });
            }
        }

        tracing::info!("Created {} view(s)", tables.len());
        Ok(tables.len())
    }

    /// The statements [`Generator::create_views`] would run, without running them.
    pub async fn plan_views<E>(&self, db: &E) -> ShroudResult<Vec<ViewPlan>>
    where
        E: SchemaExecutor + ?Sized,
    {
        let tables = self.list_tables(db).await?;
        let mut plans = Vec::with_capacity(tables.len());
        for table in &tables {
            plans.push(self.plan_view(db, table).await?);
        }
        Ok(plans)
    }

    async fn list_tables<E>(&self, db: &E) -> ShroudResult<Vec<String>>
    where
        E: SchemaExecutor + ?Sized,
    {
        db.fetch_names(self.query_builder.list_tables_query(), None)
            .await
            .map_err(ShroudError::ListTables)
    }

    async fn plan_view<E>(&self, db: &E, table: &str) -> ShroudResult<ViewPlan>
    where
        E: SchemaExecutor + ?Sized,
    {
        let columns = db
            .fetch_names(self.query_builder.list_columns_query(), Some(table))
            .await
            .map_err(|source| ShroudError::ListColumns {
                table: table.to_string(),
                source,
            })?;

        let fragments = self.column_fragments(table, &columns);
        let view = self.view_name(table);
        let sql = self.query_builder.create_view_query(&view, table, &fragments);

        Ok(ViewPlan {
            table: table.to_string(),
            view,
            sql,
        })
    }
}

/// Builder for [`Generator`].
#[derive(Debug)]
pub struct GeneratorBuilder {
    query_builder: Box<dyn QueryBuilder>,
    tables: HashMap<String, Table>,
    view_suffix: String,
}

impl GeneratorBuilder {
    /// Suffix of the generated view names (default `anonymized`).
    ///
    /// Must not be empty for [`Generator::clear_views`] to run.
    pub fn view_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.view_suffix = suffix.into();
        self
    }

    /// Configure a table. A later call for the same name replaces it.
    pub fn table(mut self, name: impl Into<String>, table: Table) -> Self {
        self.tables.insert(name.into(), table);
        self
    }

    pub fn build(self) -> Generator {
        Generator {
            query_builder: self.query_builder,
            tables: self.tables,
            view_suffix: self.view_suffix,
        }
    }
}
