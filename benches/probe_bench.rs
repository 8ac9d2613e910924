//! Criterion harness: every probe, both modes, against an in-memory SQLite
//! table. Useful for spotting regressions in the harness itself without a
//! PostgreSQL server.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use scan_bench::backend::sqlite::SqliteBackend;
use scan_bench::config::BenchConfig;
use scan_bench::loader;
use scan_bench::probes::{ProbeKind, ProbeSet};
use scan_bench::schema;

const ROWS: u64 = 20_000;

fn setup_db() -> SqliteBackend {
    let mut conn = SqliteBackend::open_in_memory().expect("Failed to open in-memory SQLite");
    schema::reset(&mut conn, false).expect("Failed to create table");
    loader::load(&mut conn, ROWS).expect("Failed to load");
    conn
}

fn bench_probes(c: &mut Criterion) {
    let mut conn = setup_db();

    for count_mode in [false, true] {
        let label = if count_mode { "probe/count" } else { "probe/materialize" };
        let probes = ProbeSet::new(&BenchConfig {
            count_mode,
            ..BenchConfig::new(ROWS)
        });
        let mut group = c.benchmark_group(label);
        group.sample_size(30);

        for kind in ProbeKind::ALL {
            group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
                b.iter(|| probes.run(&mut conn, kind).expect("probe failed"));
            });
        }
        group.finish();
    }
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    group.sample_size(10);
    group.bench_function(BenchmarkId::from_parameter(ROWS), |b| {
        b.iter(setup_db);
    });
    group.finish();
}

criterion_group!(benches, bench_probes, bench_load);
criterion_main!(benches);
