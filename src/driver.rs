//! Wires one run together: schema reset, bulk load, timed probes.

use crate::backend::SqlConnection;
use crate::config::BenchConfig;
use crate::error::{BenchError, BenchResult};
use crate::loader;
use crate::populate::EXTRA_ID_MODULUS;
use crate::probes::{ProbeKind, ProbeSet};
use crate::report::TimingReport;
use crate::schema;
use crate::timing::{self, TimedProbe};

/// Build the ordered probe list for `kinds`.
///
/// The closures own a copy of `probes`, so the list borrows nothing but the
/// connection type it runs against.
pub fn probe_sequence<'c>(
    probes: ProbeSet,
    kinds: &[ProbeKind],
) -> Vec<TimedProbe<'c, dyn SqlConnection + 'c, BenchError>> {
    kinds
        .iter()
        .map(|&kind| {
            let probe: TimedProbe<'c, dyn SqlConnection + 'c, BenchError> =
                Box::new(move |conn: &mut (dyn SqlConnection + 'c)| probes.run(conn, kind));
            probe
        })
        .collect()
}

/// Run every enabled stage of `config` against `conn`.
///
/// Returns the timing report when the probe stage ran.
pub fn run(config: &BenchConfig, conn: &mut dyn SqlConnection) -> BenchResult<Option<TimingReport>> {
    config.validate()?;

    if config.create {
        schema::reset(conn, config.partition)?;
        log::info!("Completed Init");
    }

    if config.load {
        let stats = loader::load(conn, config.rows)?;
        log::info!(
            "Completed Batch Insert: {} rows in {} statements",
            stats.rows,
            stats.statements
        );
    }

    if !config.execute {
        return Ok(None);
    }

    if config.rows % EXTRA_ID_MODULUS != 0 {
        log::warn!(
            "{} rows is not a multiple of {EXTRA_ID_MODULUS}; selectivity fractions are approximate",
            config.rows
        );
    }

    let probes = ProbeSet::new(config);
    let sequence = probe_sequence(probes, &config.probes);
    let mut report = TimingReport::new();
    for iteration in 1..=config.iterations {
        let durations = timing::run_sequence(conn, &sequence)?;
        log::debug!("Iteration {iteration}/{} complete", config.iterations);
        report.add_sequence(&config.probes, &durations);
    }
    Ok(Some(report))
}
