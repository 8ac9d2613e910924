//! The fixed benchmark table and its drop-and-recreate reset.

use crate::backend::SqlConnection;
use crate::error::{BenchError, BenchResult};

pub const TABLE_NAME: &str = "A";

/// `id`, `name`, `extra_id`, `single`.
pub const NUM_COLUMNS: usize = 4;

pub const DROP_TABLE: &str = "DROP TABLE IF EXISTS A";

pub const CREATE_TABLE: &str =
    "CREATE TABLE A (id INT PRIMARY KEY, name TEXT, extra_id INT, single INT)";

pub const CREATE_PARTITIONED_TABLE: &str =
    "CREATE TABLE A (id INT PRIMARY KEY, name TEXT, extra_id INT, single INT) PARTITION BY extra_id";

pub fn create_statement(partitioned: bool) -> &'static str {
    if partitioned {
        CREATE_PARTITIONED_TABLE
    } else {
        CREATE_TABLE
    }
}

/// Drop the table if it exists and create it again. Destroys prior data.
pub fn reset(conn: &mut dyn SqlConnection, partitioned: bool) -> BenchResult<()> {
    for statement in [DROP_TABLE, create_statement(partitioned)] {
        conn.execute(statement).map_err(|source| BenchError::Setup {
            statement: statement.to_string(),
            source,
        })?;
    }
    if partitioned {
        log::info!("Created table {TABLE_NAME} partitioned by extra_id");
    } else {
        log::info!("Created table {TABLE_NAME}");
    }
    Ok(())
}
