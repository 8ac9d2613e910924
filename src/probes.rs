//! The five fixed scan probes.
//!
//! | Probe         | Predicate         | Expected rows (N multiple of 1000) |
//! |---------------|-------------------|------------------------------------|
//! | FullScan      | none              | N                                  |
//! | PointLookup   | `single = 10`     | 1                                  |
//! | Selectivity1  | `extra_id < 10`   | N / 100                            |
//! | Selectivity10 | `extra_id < 100`  | N / 10                             |
//! | Selectivity50 | `extra_id >= 500` | N / 2                              |
//!
//! Each probe runs either in materialize mode (drain every row, check the
//! column count) or in count mode (`COUNT(*)` with the same predicate, check
//! the scalar). The mode is chosen once per run.

use crate::backend::SqlConnection;
use crate::config::BenchConfig;
use crate::error::{BackendError, BenchError, BenchResult, VerificationFailure};
use crate::populate::EXTRA_ID_MODULUS;
use crate::schema::{NUM_COLUMNS, TABLE_NAME};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ProbeKind {
    FullScan,
    PointLookup,
    Selectivity1,
    Selectivity10,
    Selectivity50,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Less,
    GreaterOrEqual,
}

impl ProbeKind {
    pub const ALL: [ProbeKind; 5] = [
        ProbeKind::FullScan,
        ProbeKind::PointLookup,
        ProbeKind::Selectivity1,
        ProbeKind::Selectivity10,
        ProbeKind::Selectivity50,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ProbeKind::FullScan => "FullScan",
            ProbeKind::PointLookup => "PointLookup",
            ProbeKind::Selectivity1 => "Selectivity1",
            ProbeKind::Selectivity10 => "Selectivity10",
            ProbeKind::Selectivity50 => "Selectivity50",
        }
    }

    /// Range predicate on `extra_id`, if this is a selectivity probe.
    fn extra_id_range(self) -> Option<(Comparison, u64)> {
        match self {
            ProbeKind::Selectivity1 => Some((Comparison::Less, 10)),
            ProbeKind::Selectivity10 => Some((Comparison::Less, 100)),
            ProbeKind::Selectivity50 => Some((Comparison::GreaterOrEqual, 500)),
            ProbeKind::FullScan | ProbeKind::PointLookup => None,
        }
    }

    /// SQL text, with placeholders rendered by `placeholder`.
    pub fn sql(self, count_mode: bool, placeholder: impl Fn(usize) -> String) -> String {
        let projection = if count_mode { "COUNT(*)" } else { "*" };
        let base = format!("SELECT {projection} FROM {TABLE_NAME}");
        match (self, self.extra_id_range()) {
            (_, Some((Comparison::Less, _))) => format!("{base} WHERE extra_id < {}", placeholder(1)),
            (_, Some((Comparison::GreaterOrEqual, _))) => {
                format!("{base} WHERE extra_id >= {}", placeholder(1))
            }
            (ProbeKind::PointLookup, None) => format!("{base} WHERE single = 10"),
            _ => base,
        }
    }

    /// Bound parameters matching [`sql`](Self::sql).
    pub fn params(self) -> Vec<i32> {
        self.extra_id_range()
            .map(|(_, bound)| vec![bound as i32])
            .unwrap_or_default()
    }

    /// Rows this probe must see after `1..=rows` have been loaded.
    ///
    /// Counted exactly from the generated distribution, so the selectivity
    /// probes equal N/100, N/10 and N/2 when N is a multiple of 1000 and stay
    /// correct otherwise. The point lookup always expects one row: a table
    /// with fewer than ten rows is a verification failure, not a pass.
    pub fn expected_rows(self, rows: u64) -> u64 {
        match self.extra_id_range() {
            None if self == ProbeKind::PointLookup => 1,
            None => rows,
            Some((comparison, bound)) => {
                let cycles = rows / EXTRA_ID_MODULUS;
                // The trailing partial cycle covers extra_id 1..=tail.
                let tail = rows % EXTRA_ID_MODULUS;
                match comparison {
                    Comparison::Less => cycles * bound + tail.min(bound - 1),
                    Comparison::GreaterOrEqual => {
                        cycles * (EXTRA_ID_MODULUS - bound) + (tail + 1).saturating_sub(bound)
                    }
                }
            }
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs probes against a loaded table.
#[derive(Debug, Clone, Copy)]
pub struct ProbeSet {
    rows: u64,
    count_mode: bool,
}

impl ProbeSet {
    pub fn new(config: &BenchConfig) -> Self {
        Self {
            rows: config.rows,
            count_mode: config.count_mode,
        }
    }

    /// Execute `probe` once and verify its result. Never mutates data.
    pub fn run(&self, conn: &mut dyn SqlConnection, probe: ProbeKind) -> BenchResult<()> {
        let sql = probe.sql(self.count_mode, |n| conn.placeholder(n));
        let params = probe.params();
        let expected = probe.expected_rows(self.rows);

        let failure = if self.count_mode {
            check_count(conn, probe, &sql, &params, expected)?
        } else {
            check_materialized(conn, probe, &sql, &params, expected)?
        };

        match failure {
            Some(failure) => Err(BenchError::Verification { probe, failure }),
            None => {
                log::debug!("{probe} successful");
                Ok(())
            }
        }
    }
}

fn check_materialized(
    conn: &mut dyn SqlConnection,
    probe: ProbeKind,
    sql: &str,
    params: &[i32],
    expected: u64,
) -> BenchResult<Option<VerificationFailure>> {
    let mut rows = 0u64;
    let columns = conn
        .query(sql, params, &mut |_| {
            rows += 1;
            Ok(())
        })
        .map_err(|source| BenchError::Probe { probe, source })?;

    if columns != NUM_COLUMNS {
        return Ok(Some(VerificationFailure::ColumnCount {
            actual: columns,
            expected: NUM_COLUMNS,
        }));
    }
    Ok((rows != expected).then_some(VerificationFailure::RowCount {
        actual: rows,
        expected,
    }))
}

fn check_count(
    conn: &mut dyn SqlConnection,
    probe: ProbeKind,
    sql: &str,
    params: &[i32],
    expected: u64,
) -> BenchResult<Option<VerificationFailure>> {
    let mut count = None;
    conn.query(sql, params, &mut |row| {
        if count.is_none() {
            count = Some(row.get_i64(0)?);
        }
        Ok(())
    })
    .map_err(|source| BenchError::Probe { probe, source })?;

    let Some(count) = count else {
        return Ok(Some(VerificationFailure::NoRows));
    };
    let actual = u64::try_from(count).map_err(|_| BenchError::Probe {
        probe,
        source: BackendError::Column {
            index: 0,
            message: format!("negative COUNT(*) {count}"),
        },
    })?;
    Ok((actual != expected).then_some(VerificationFailure::RowCount { actual, expected }))
}
