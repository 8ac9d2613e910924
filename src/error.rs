//! Error taxonomy for a benchmark run.
//!
//! Every variant is fatal to the run. The split only exists so the report
//! tells a broken backend apart from data that does not match what the
//! loader should have produced.

use crate::probes::ProbeKind;
use thiserror::Error;

pub type BenchResult<T> = std::result::Result<T, BenchError>;

/// Failures raised by a [`SqlConnection`](crate::backend::SqlConnection)
/// implementation, passed upward without modification.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("postgres: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The private runtime driving the async postgres driver could not start.
    #[error("runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("column {index}: {message}")]
    Column { index: usize, message: String },
}

/// Why a multi-row insert was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    #[error("Incorrect query execute status: insert returned a result set")]
    UnexpectedStatementKind,

    #[error("Unexpected update count: {actual}/{expected}")]
    UnexpectedUpdateCount { actual: u64, expected: u64 },
}

/// Observed probe result disagrees with the analytically expected one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationFailure {
    #[error("Incorrect number of rows returned: {actual} Expected: {expected}")]
    RowCount { actual: u64, expected: u64 },

    #[error("Table should have {expected} columns, got {actual}")]
    ColumnCount { actual: usize, expected: usize },

    #[error("No rows returned from the table")]
    NoRows,
}

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("schema setup failed on `{statement}`: {source}")]
    Setup {
        statement: String,
        #[source]
        source: BackendError,
    },

    #[error("load aborted at insert #{statement_index} (first id {first_id}): {kind}")]
    Load {
        statement_index: u64,
        first_id: u64,
        kind: LoadFailure,
    },

    #[error("insert #{statement_index} (first id {first_id}) failed: {source}")]
    LoadStatement {
        statement_index: u64,
        first_id: u64,
        #[source]
        source: BackendError,
    },

    #[error("{probe} verification failed: {failure}")]
    Verification {
        probe: ProbeKind,
        failure: VerificationFailure,
    },

    #[error("{probe} failed: {source}")]
    Probe {
        probe: ProbeKind,
        #[source]
        source: BackendError,
    },

    #[error("connection failed: {0}")]
    Connect(#[source] BackendError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Coarse classification of a [`BenchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Setup,
    Load,
    Verification,
    Backend,
    Config,
}

impl BenchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BenchError::Setup { .. } => ErrorKind::Setup,
            BenchError::Load { .. } => ErrorKind::Load,
            BenchError::Verification { .. } => ErrorKind::Verification,
            BenchError::LoadStatement { .. }
            | BenchError::Probe { .. }
            | BenchError::Connect(_) => ErrorKind::Backend,
            BenchError::Config(_) => ErrorKind::Config,
        }
    }
}
