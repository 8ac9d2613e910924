//! Bulk loader: batches generated rows into multi-row `INSERT` statements.
//!
//! Two groupings:
//! - a **batch** of up to [`BATCH_SIZE`] rows, used only for progress reporting
//! - a **statement group** of [`STATEMENT_ROWS`] rows, one `INSERT` each
//!
//! Every insert must come back as a row-mutating statement that touched
//! exactly as many rows as it carried. Anything else aborts the load; there
//! is no retry and no partial-success continuation.

use crate::backend::{SqlConnection, StatementOutcome};
use crate::error::{BenchError, BenchResult, LoadFailure};
use crate::populate::{generate_row, Row};

pub const BATCH_SIZE: u64 = 10_000;
pub const STATEMENT_ROWS: u64 = 40;
pub const INSERT_PREFIX: &str = "INSERT INTO A VALUES ";

/// What a completed load did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub statements: u64,
    pub rows: u64,
    pub batches: u64,
}

/// Render one multi-row insert.
pub fn insert_statement(rows: &[Row]) -> String {
    let values: Vec<String> = rows.iter().map(Row::values_tuple).collect();
    format!("{INSERT_PREFIX}{}", values.join(","))
}

/// Number of inserts needed for `total_rows`.
pub fn statement_count(total_rows: u64) -> u64 {
    let full_batches = total_rows / BATCH_SIZE;
    let tail = total_rows % BATCH_SIZE;
    full_batches * BATCH_SIZE.div_ceil(STATEMENT_ROWS) + tail.div_ceil(STATEMENT_ROWS)
}

/// Generate and insert rows `1..=total_rows`.
pub fn load(conn: &mut dyn SqlConnection, total_rows: u64) -> BenchResult<LoadStats> {
    let mut stats = LoadStats::default();
    let mut group: Vec<Row> = Vec::with_capacity(STATEMENT_ROWS as usize);

    while stats.rows < total_rows {
        let batch_len = BATCH_SIZE.min(total_rows - stats.rows);
        let mut offset = 0;

        while offset < batch_len {
            let group_len = STATEMENT_ROWS.min(batch_len - offset);
            let first_id = stats.rows + offset + 1;

            group.clear();
            // Name tokens follow the 1-based position inside the batch.
            group.extend((0..group_len).map(|k| generate_row(first_id + k, offset + k + 1)));

            stats.statements += 1;
            insert_group(conn, &group, stats.statements, first_id)?;
            offset += group_len;
        }

        stats.rows += batch_len;
        stats.batches += 1;
        log::info!("Inserted {} rows out of {} rows.", stats.rows, total_rows);
    }

    Ok(stats)
}

fn insert_group(
    conn: &mut dyn SqlConnection,
    group: &[Row],
    statement_index: u64,
    first_id: u64,
) -> BenchResult<()> {
    let sql = insert_statement(group);
    let outcome = conn
        .execute(&sql)
        .map_err(|source| BenchError::LoadStatement {
            statement_index,
            first_id,
            source,
        })?;

    let expected = group.len() as u64;
    let kind = match outcome {
        StatementOutcome::RowsAffected(actual) if actual == expected => return Ok(()),
        StatementOutcome::RowsAffected(actual) => {
            LoadFailure::UnexpectedUpdateCount { actual, expected }
        }
        StatementOutcome::RowsReturned => LoadFailure::UnexpectedStatementKind,
    };
    Err(BenchError::Load {
        statement_index,
        first_id,
        kind,
    })
}
