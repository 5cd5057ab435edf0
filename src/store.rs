//! Connection handle and CRUD helpers over rusqlite.
//!
//! The store is a thin wrapper: `define` executes generated DDL, `create` and
//! `find_all` are parameterized string builders, and `query`/`execute` pass
//! raw SQL straight through to the driver.

use std::path::Path;

use rusqlite::{params_from_iter, Connection};
use tracing::{debug, info};

use crate::ddl::create_table_sql;
use crate::error::Result;
use crate::model::ModelDefinition;
use crate::value::{Row, Value};

/// Configuration for opening a store: database path plus the models whose
/// tables are created on open.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub db_path: String,
    pub models: Vec<ModelDefinition>,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            models: Vec::new(),
        }
    }

    pub fn model(mut self, model: ModelDefinition) -> Self {
        self.models.push(model);
        self
    }
}

/// Projection, filtering and ordering for [`SqliteStore::find_all`].
///
/// Filters are equality predicates ANDed together and bound as parameters.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub columns: Option<Vec<String>>,
    pub filter: Vec<(String, Value)>,
    /// `(column, ascending)` pairs.
    pub order_by: Vec<(String, bool)>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.get_or_insert_with(Vec::new).push(name.into());
        self
    }

    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.push((column.into(), value.into()));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order_by.push((column.into(), ascending));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Synchronous SQLite store wrapping a single connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database at the configured path and
    /// create the tables for every configured model.
    pub fn open(config: StoreConfig) -> Result<Self> {
        if let Some(parent) = Path::new(&config.db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }
        info!(path = %config.db_path, "opening sqlite store");
        Self::initialize(Connection::open(&config.db_path)?, &config.models)
    }

    /// In-memory store, mainly for tests.
    pub fn open_in_memory(models: &[ModelDefinition]) -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?, models)
    }

    fn initialize(conn: Connection, models: &[ModelDefinition]) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        let store = Self { conn };
        for model in models {
            store.define(model)?;
        }
        Ok(store)
    }

    /// Generate and execute the DDL for one model.
    pub fn define(&self, model: &ModelDefinition) -> Result<()> {
        let sql = create_table_sql(model)?;
        debug!(table = %model.table_name, %sql, "creating table");
        self.conn.execute(&sql, [])?;
        Ok(())
    }

    /// Insert one row; returns the new rowid.
    pub fn create(&self, table: &str, values: &[(&str, Value)]) -> Result<i64> {
        let columns: Vec<&str> = values.iter().map(|(column, _)| *column).collect();
        let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders.join(", ")
        );
        let params: Vec<&Value> = values.iter().map(|(_, value)| value).collect();
        self.conn.execute(&sql, params_from_iter(params))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Select rows with optional projection, equality filters, ordering and
    /// limit/offset.
    pub fn find_all(&self, table: &str, options: &FindOptions) -> Result<Vec<Row>> {
        let projection = options
            .columns
            .as_ref()
            .map(|columns| columns.join(", "))
            .unwrap_or_else(|| "*".to_string());
        let mut sql = format!("SELECT {} FROM {}", projection, table);
        let mut params: Vec<&Value> = Vec::new();

        if !options.filter.is_empty() {
            let predicates: Vec<String> = options
                .filter
                .iter()
                .enumerate()
                .map(|(i, (column, _))| format!("{} = ?{}", column, i + 1))
                .collect();
            params.extend(options.filter.iter().map(|(_, value)| value));
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }
        if !options.order_by.is_empty() {
            let terms: Vec<String> = options
                .order_by
                .iter()
                .map(|(column, ascending)| {
                    format!("{} {}", column, if *ascending { "ASC" } else { "DESC" })
                })
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }
        match (options.limit, options.offset) {
            (Some(limit), Some(offset)) => {
                sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));
            }
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {}", limit)),
            // SQLite has no bare OFFSET; -1 means no limit.
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
            (None, None) => {}
        }

        self.select(&sql, params)
    }

    /// Raw SELECT passthrough with positional parameters.
    pub fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        self.select(sql, params.iter())
    }

    /// Raw statement passthrough; returns the number of affected rows.
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<usize> {
        Ok(self.conn.execute(sql, params_from_iter(params.iter()))?)
    }

    /// Direct access to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn select<I>(&self, sql: &str, params: I) -> Result<Vec<Row>>
    where
        I: IntoIterator,
        I::Item: rusqlite::ToSql,
    {
        let mut statement = self.conn.prepare(sql)?;
        let column_names: Vec<String> = statement
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let mut rows = statement.query(params_from_iter(params))?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Row::with_capacity(column_names.len());
            for (index, name) in column_names.iter().enumerate() {
                let value: rusqlite::types::Value = row.get(index)?;
                record.insert(name.clone(), Value::from(value));
            }
            result.push(record);
        }
        Ok(result)
    }
}
