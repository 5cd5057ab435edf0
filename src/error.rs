use thiserror::Error;

/// Errors surfaced by DDL generation and the store.
///
/// Malformed table constraints (empty field lists, missing references) are
/// not errors; generation skips them and moves on.
#[derive(Debug, Error)]
pub enum Error {
    /// `options.virtual_table` was set without a `using` module name.
    #[error("invalid virtual table spec for `{table}`: missing USING module name")]
    InvalidVirtualTableSpec { table: String },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
