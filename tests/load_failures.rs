//! Loader and probe verification against a scripted connection that
//! misreports what each statement did.

use scan_bench::backend::{RowVisitor, SqlConnection, StatementOutcome};
use scan_bench::config::BenchConfig;
use scan_bench::error::{BackendError, BenchError, ErrorKind, LoadFailure, VerificationFailure};
use scan_bench::loader::{self, INSERT_PREFIX, STATEMENT_ROWS};
use scan_bench::probes::{ProbeKind, ProbeSet};
use std::collections::HashMap;

/// Records every statement; answers inserts with the real tuple count unless
/// an override is scripted for that statement number (1-based). Queries
/// describe a single column and return no rows.
#[derive(Default)]
struct ScriptedConnection {
    statements: Vec<String>,
    overrides: HashMap<usize, StatementOutcome>,
}

impl ScriptedConnection {
    fn with_override(statement: usize, outcome: StatementOutcome) -> Self {
        Self {
            overrides: HashMap::from([(statement, outcome)]),
            ..Self::default()
        }
    }

    fn tuples_in(sql: &str) -> u64 {
        sql.matches("),(").count() as u64 + 1
    }
}

impl SqlConnection for ScriptedConnection {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn execute(&mut self, sql: &str) -> Result<StatementOutcome, BackendError> {
        self.statements.push(sql.to_string());
        if let Some(outcome) = self.overrides.get(&self.statements.len()) {
            return Ok(*outcome);
        }
        Ok(StatementOutcome::RowsAffected(Self::tuples_in(sql)))
    }

    fn query(
        &mut self,
        sql: &str,
        _params: &[i32],
        _on_row: &mut RowVisitor<'_>,
    ) -> Result<usize, BackendError> {
        self.statements.push(sql.to_string());
        Ok(1)
    }

    fn placeholder(&self, n: usize) -> String {
        format!("${n}")
    }

    fn close(self: Box<Self>) -> Result<(), BackendError> {
        Ok(())
    }
}

#[test]
fn thirty_nine_affected_rows_aborts_the_load() {
    let mut conn = ScriptedConnection::with_override(3, StatementOutcome::RowsAffected(39));
    let err = loader::load(&mut conn, 1000).unwrap_err();

    match &err {
        BenchError::Load {
            statement_index,
            first_id,
            kind,
        } => {
            assert_eq!(*statement_index, 3);
            assert_eq!(*first_id, 81);
            assert_eq!(
                *kind,
                LoadFailure::UnexpectedUpdateCount {
                    actual: 39,
                    expected: 40
                }
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.kind(), ErrorKind::Load);
    // Nothing is issued after the failing statement.
    assert_eq!(conn.statements.len(), 3);
}

#[test]
fn result_set_from_an_insert_aborts_the_load() {
    let mut conn = ScriptedConnection::with_override(1, StatementOutcome::RowsReturned);
    let err = loader::load(&mut conn, 100).unwrap_err();
    assert!(matches!(
        err,
        BenchError::Load {
            kind: LoadFailure::UnexpectedStatementKind,
            ..
        }
    ));
    assert_eq!(conn.statements.len(), 1);
}

#[test]
fn statement_count_law_holds() {
    for rows in [0u64, 1, 39, 40, 41, 1000, 9_999, 10_000, 10_001, 25_000] {
        let mut conn = ScriptedConnection::default();
        let stats = loader::load(&mut conn, rows).unwrap();
        assert_eq!(stats.statements, rows.div_ceil(STATEMENT_ROWS), "rows={rows}");
        assert_eq!(conn.statements.len() as u64, stats.statements);

        let sizes: Vec<u64> = conn
            .statements
            .iter()
            .map(|s| ScriptedConnection::tuples_in(s))
            .collect();
        if let Some((last, full)) = sizes.split_last() {
            assert!(full.iter().all(|&n| n == STATEMENT_ROWS));
            let tail = rows % STATEMENT_ROWS;
            assert_eq!(*last, if tail == 0 { STATEMENT_ROWS } else { tail });
        }
    }
}

#[test]
fn every_insert_is_a_multi_row_literal_statement() {
    let mut conn = ScriptedConnection::default();
    loader::load(&mut conn, 45).unwrap();
    assert!(conn.statements.iter().all(|s| s.starts_with(INSERT_PREFIX)));
    assert!(conn.statements[0].starts_with("INSERT INTO A VALUES (1,'OUGHT',1,1),(2,'ABLE',2,2),"));
    assert!(conn.statements[1].ends_with("(45,'ESE',45,45)"));
}

#[test]
fn rows_are_numbered_continuously_across_batches() {
    let mut conn = ScriptedConnection::default();
    loader::load(&mut conn, 10_040).unwrap();
    let last = conn.statements.last().unwrap();
    assert!(last.starts_with("INSERT INTO A VALUES (10001,'OUGHT',1,10001),"));
    assert!(last.ends_with("(10040,'BAR',40,10040)"));
}

// ── Probes ──────────────────────────────────────────────────────────

#[test]
fn count_query_without_a_row_fails_verification() {
    let mut conn = ScriptedConnection::default();
    let probes = ProbeSet::new(&BenchConfig {
        count_mode: true,
        ..BenchConfig::new(1000)
    });
    let err = probes.run(&mut conn, ProbeKind::FullScan).unwrap_err();
    assert!(matches!(
        err,
        BenchError::Verification {
            probe: ProbeKind::FullScan,
            failure: VerificationFailure::NoRows,
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Verification);
    assert!(err.to_string().contains("No rows returned from the table"));
    assert_eq!(conn.statements, vec!["SELECT COUNT(*) FROM A".to_string()]);
}
