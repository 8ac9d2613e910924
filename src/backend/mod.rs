//! Connection abstraction and the `SqlConnection` trait.
//!
//! Two implementations are provided:
//! - [`postgres::PostgresBackend`]: a live server over the postgres wire protocol
//! - [`sqlite::SqliteBackend`]: embedded SQLite, for local smoke runs and tests

pub mod postgres;
pub mod sqlite;

use crate::config::{BackendKind, ConnectionConfig};
use crate::error::{BackendError, BenchError, BenchResult};

/// What kind of statement `execute` just ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementOutcome {
    /// Row-mutating statement (or DDL) with its affected-row count.
    RowsAffected(u64),
    /// The statement produced a result set.
    RowsReturned,
}

/// One row of a streamed result set.
pub trait ResultRow {
    fn get_i64(&self, index: usize) -> Result<i64, BackendError>;
}

/// Visitor invoked once per result row, in result order.
pub type RowVisitor<'a> = dyn FnMut(&dyn ResultRow) -> Result<(), BackendError> + 'a;

/// A single, exclusively owned connection to the backend under test.
///
/// Calls are blocking and strictly sequential. Dropping the connection
/// releases it; [`close`](SqlConnection::close) does the same but reports
/// errors from the shutdown handshake.
pub trait SqlConnection {
    /// Human-readable name for logs.
    fn name(&self) -> &'static str;

    /// Run one unparameterized statement.
    fn execute(&mut self, sql: &str) -> Result<StatementOutcome, BackendError>;

    /// Run a parameterized query and stream every row to `on_row`.
    ///
    /// Rows are never buffered by the backend: the visitor sees each one as
    /// it is read off the result. Returns the number of result columns as
    /// described by the prepared statement, so it is known even when no row
    /// comes back.
    fn query(
        &mut self,
        sql: &str,
        params: &[i32],
        on_row: &mut RowVisitor<'_>,
    ) -> Result<usize, BackendError>;

    /// Placeholder for the `n`-th (1-based) bound parameter.
    fn placeholder(&self, n: usize) -> String;

    fn close(self: Box<Self>) -> Result<(), BackendError>;
}

/// Open the backend described by `config`.
pub fn connect(config: &ConnectionConfig) -> BenchResult<Box<dyn SqlConnection>> {
    let conn: Box<dyn SqlConnection> = match config.backend {
        BackendKind::Postgres => Box::new(
            postgres::PostgresBackend::connect(&config.database_url).map_err(BenchError::Connect)?,
        ),
        BackendKind::Sqlite => Box::new(
            sqlite::SqliteBackend::open(&config.sqlite_path).map_err(BenchError::Connect)?,
        ),
    };
    log::info!("Connected to {}", conn.name());
    Ok(conn)
}
