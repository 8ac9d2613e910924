//! Embedded SQLite backend (via rusqlite).
//!
//! Configuration: WAL mode (file databases), synchronous off, large page cache.
//! SQLite has no `PARTITION BY` clause, so a partitioned schema is rejected
//! by the engine at setup time.

use super::{ResultRow, RowVisitor, SqlConnection, StatementOutcome};
use crate::error::BackendError;
use rusqlite::{params_from_iter, Connection};

pub const IN_MEMORY: &str = ":memory:";

pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Open `path`, or a private in-memory database for `":memory:"`.
    pub fn open(path: &str) -> Result<Self, BackendError> {
        let conn = if path == IN_MEMORY {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, BackendError> {
        Self::open(IN_MEMORY)
    }
}

/// Tune a connection for bulk load and scan throughput.
pub fn configure_connection(conn: &Connection) -> Result<(), BackendError> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = OFF;
         PRAGMA cache_size = -131072;
         PRAGMA temp_store = MEMORY;",
    )?;
    Ok(())
}

struct SqliteResultRow<'r, 's>(&'r rusqlite::Row<'s>);

impl ResultRow for SqliteResultRow<'_, '_> {
    fn get_i64(&self, index: usize) -> Result<i64, BackendError> {
        Ok(self.0.get::<_, i64>(index)?)
    }
}

impl SqlConnection for SqliteBackend {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn execute(&mut self, sql: &str) -> Result<StatementOutcome, BackendError> {
        let mut stmt = self.conn.prepare(sql)?;
        if stmt.column_count() > 0 {
            let mut rows = stmt.raw_query();
            while rows.next()?.is_some() {}
            return Ok(StatementOutcome::RowsReturned);
        }
        let affected = stmt.raw_execute()?;
        Ok(StatementOutcome::RowsAffected(affected as u64))
    }

    fn query(
        &mut self,
        sql: &str,
        params: &[i32],
        on_row: &mut RowVisitor<'_>,
    ) -> Result<usize, BackendError> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns = stmt.column_count();
        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        while let Some(row) = rows.next()? {
            on_row(&SqliteResultRow(row))?;
        }
        Ok(columns)
    }

    fn placeholder(&self, n: usize) -> String {
        format!("?{n}")
    }

    fn close(self: Box<Self>) -> Result<(), BackendError> {
        self.conn.close().map_err(|(_, err)| BackendError::Sqlite(err))
    }
}
