//! Declarative SQLite models: DDL generation and CRUD helpers over rusqlite.
//!
//! # Intention
//!
//! - Turn declarative model definitions into `CREATE TABLE` /
//!   `CREATE VIRTUAL TABLE` statements.
//! - Provide basic CRUD helpers (`find_all`, `create`, raw passthrough) over
//!   an open connection.
//!
//! # Architectural Boundaries
//!
//! - The driver owns transactions, statement execution and row storage; this
//!   crate only builds SQL strings and binds parameters.
//! - No query planner, no caching, no migration engine.

pub mod ddl;
pub mod error;
pub mod model;
pub mod store;
pub mod value;

pub use ddl::create_table_sql;
pub use error::{Error, Result};
pub use model::{
    Attribute, CheckConstraint, DataType, Deferrable, ForeignKeyConstraint, Generated,
    ModelDefinition, References, ReferentialAction, SqlLiteral, TableConstraints, TableOptions,
    Unique, UniqueConstraint, VirtualTable,
};
pub use store::{FindOptions, SqliteStore, StoreConfig};
pub use value::{Row, Value};
