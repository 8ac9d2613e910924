//! PostgreSQL backend via `sqlx`.
//!
//! sqlx is async; the harness is not. Each backend owns a private
//! current-thread runtime and blocks on it for every call, so exactly one
//! statement is ever in flight.

use super::{ResultRow, RowVisitor, SqlConnection, StatementOutcome};
use crate::error::BackendError;
use futures::TryStreamExt;
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{Connection, Either, Executor, Row, Statement};
use tokio::runtime::{Builder, Runtime};

pub struct PostgresBackend {
    // Declared before `runtime` so the socket is dropped while the runtime
    // is still alive.
    conn: PgConnection,
    runtime: Runtime,
}

impl PostgresBackend {
    pub fn connect(url: &str) -> Result<Self, BackendError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let conn = runtime.block_on(PgConnection::connect(url))?;
        Ok(Self { conn, runtime })
    }
}

struct PgResultRow<'r>(&'r PgRow);

impl ResultRow for PgResultRow<'_> {
    fn get_i64(&self, index: usize) -> Result<i64, BackendError> {
        Ok(self.0.try_get::<i64, _>(index)?)
    }
}

impl SqlConnection for PostgresBackend {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn execute(&mut self, sql: &str) -> Result<StatementOutcome, BackendError> {
        let conn = &mut self.conn;
        self.runtime.block_on(async move {
            // Simple-query protocol, same as a plain JDBC-style statement.
            let mut results = conn.fetch_many(sql);
            let mut affected = 0u64;
            let mut returned_rows = false;
            while let Some(step) = results.try_next().await? {
                match step {
                    Either::Left(done) => affected += done.rows_affected(),
                    Either::Right(_) => returned_rows = true,
                }
            }
            let outcome = if returned_rows {
                StatementOutcome::RowsReturned
            } else {
                StatementOutcome::RowsAffected(affected)
            };
            Ok::<_, BackendError>(outcome)
        })
    }

    fn query(
        &mut self,
        sql: &str,
        params: &[i32],
        on_row: &mut RowVisitor<'_>,
    ) -> Result<usize, BackendError> {
        let conn = &mut self.conn;
        self.runtime.block_on(async move {
            // Lands in the connection's statement cache, so the query below
            // reuses it instead of parsing again.
            let columns = (&mut *conn).prepare(sql).await?.columns().len();
            let mut query = sqlx::query(sql);
            for param in params {
                query = query.bind(*param);
            }
            let mut rows = query.fetch(conn);
            while let Some(row) = rows.try_next().await? {
                on_row(&PgResultRow(&row))?;
            }
            Ok::<_, BackendError>(columns)
        })
    }

    fn placeholder(&self, n: usize) -> String {
        format!("${n}")
    }

    fn close(self: Box<Self>) -> Result<(), BackendError> {
        let Self { conn, runtime } = *self;
        runtime.block_on(conn.close())?;
        Ok(())
    }
}
