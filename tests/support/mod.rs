//! Scripted in-memory database for generator tests.

#![allow(dead_code)]

use shroud::engine::{ExecFuture, SchemaExecutor};
use shroud::generator::QueryBuilder;
use shroud::postgres::PostgresQueryBuilder;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Which call should fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    ListViews,
    ListTables,
    ListColumns(String),
    /// Any statement containing this text.
    Statement(String),
}

/// A call the generator made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Query { sql: String, bind: Option<String> },
    Execute(String),
}

/// Schema held in memory; DROP/CREATE statements update the view set.
#[derive(Default)]
pub struct ScriptedDb {
    tables: BTreeMap<String, Vec<String>>,
    views: Mutex<Vec<String>>,
    failures: Vec<Failure>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table with its columns in physical order.
    pub fn table(mut self, name: &str, columns: &[&str]) -> Self {
        self.tables
            .insert(name.to_string(), columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn view(self, name: &str) -> Self {
        self.views.lock().unwrap().push(name.to_string());
        self
    }

    pub fn fail(mut self, failure: Failure) -> Self {
        self.failures.push(failure);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn executed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Execute(sql) => Some(sql),
                Call::Query { .. } => None,
            })
            .collect()
    }

    pub fn views(&self) -> Vec<String> {
        let mut views = self.views.lock().unwrap().clone();
        views.sort();
        views
    }

    fn simulated() -> sqlx::Error {
        sqlx::Error::Protocol("simulated failure".to_string())
    }

    fn query(&self, sql: &str, bind: Option<&str>) -> Result<Vec<String>, sqlx::Error> {
        self.calls.lock().unwrap().push(Call::Query {
            sql: sql.to_string(),
            bind: bind.map(str::to_string),
        });

        let qb = PostgresQueryBuilder;
        if sql == qb.list_views_query() {
            if self.failures.contains(&Failure::ListViews) {
                return Err(Self::simulated());
            }
            let suffix = format!("_{}", bind.unwrap_or_default());
            return Ok(self
                .views()
                .into_iter()
                .filter(|view| view.ends_with(&suffix))
                .collect());
        }
        if sql == qb.list_tables_query() {
            if self.failures.contains(&Failure::ListTables) {
                return Err(Self::simulated());
            }
            return Ok(self.tables.keys().cloned().collect());
        }
        if sql == qb.list_columns_query() {
            let table = bind.unwrap_or_default().to_string();
            if self.failures.contains(&Failure::ListColumns(table.clone())) {
                return Err(Self::simulated());
            }
            return Ok(self.tables.get(&table).cloned().unwrap_or_default());
        }
        Err(sqlx::Error::Protocol(format!("unexpected query: {}", sql)))
    }

    fn run(&self, sql: &str) -> Result<u64, sqlx::Error> {
        self.calls.lock().unwrap().push(Call::Execute(sql.to_string()));

        let fails = self.failures.iter().any(|failure| match failure {
            Failure::Statement(text) => sql.contains(text.as_str()),
            _ => false,
        });
        if fails {
            return Err(Self::simulated());
        }

        let mut views = self.views.lock().unwrap();
        if let Some(name) = sql.strip_prefix("DROP VIEW IF EXISTS ") {
            views.retain(|view| view != name);
        } else if let Some(rest) = sql.strip_prefix("CREATE OR REPLACE VIEW ") {
            let name = rest.split_whitespace().next().unwrap_or_default().to_string();
            if !views.contains(&name) {
                views.push(name);
            }
        }
        Ok(0)
    }
}

impl SchemaExecutor for ScriptedDb {
    fn fetch_names<'a>(&'a self, sql: &'a str, bind: Option<&'a str>) -> ExecFuture<'a, Vec<String>> {
        let result = self.query(sql, bind);
        Box::pin(async move { result })
    }

    fn execute<'a>(&'a self, sql: &'a str) -> ExecFuture<'a, u64> {
        let result = self.run(sql);
        Box::pin(async move { result })
    }
}
