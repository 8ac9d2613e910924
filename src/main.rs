//! Command-line driver: parse flags, connect, run, print the timing line.
//!
//! Connection settings come from flags, then `SCAN_BENCH_*` environment
//! variables (a `.env` file is honoured), then defaults.
//!
//! Usage:
//!   scan-bench --rows 100000
//!   scan-bench -r 100000 --count --load false
//!   scan-bench -r 1000 --backend sqlite --probes point-lookup,selectivity1

use anyhow::Context;
use clap::Parser;
use scan_bench::backend;
use scan_bench::config::{BackendKind, BenchConfig, ConnectionConfig};
use scan_bench::driver;
use scan_bench::logging::initialize_logger;
use scan_bench::probes::ProbeKind;
use scan_bench::error::BackendError;
use scan_bench::report::{print_report, TimingReport};
use scan_bench::BenchResult;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "scan-bench", about = "Scan-path latency benchmark against a live SQL server")]
struct Cli {
    /// Number of rows to generate and load.
    #[arg(short = 'r', long)]
    rows: u64,

    /// Run COUNT(*) forms of the probes instead of fetching rows.
    #[arg(short = 's', long)]
    count: bool,

    /// Drop and recreate the table.
    #[arg(short = 'c', long, default_value_t = true, action = clap::ArgAction::Set)]
    create: bool,

    /// Load rows into the table.
    #[arg(short = 'l', long, default_value_t = true, action = clap::ArgAction::Set)]
    load: bool,

    /// Run and time the probes.
    #[arg(short = 'e', long, default_value_t = true, action = clap::ArgAction::Set)]
    execute: bool,

    /// Create the table partitioned by extra_id.
    #[arg(short = 'p', long, default_value_t = false, action = clap::ArgAction::Set)]
    partition: bool,

    /// Probes to time, in order (comma-separated).
    #[arg(long, value_enum, value_delimiter = ',')]
    probes: Vec<ProbeKind>,

    /// Times to run the probe sequence.
    #[arg(long, default_value_t = 1)]
    iterations: u32,

    /// Backend to connect to [env: SCAN_BENCH_BACKEND].
    #[arg(long, value_enum)]
    backend: Option<BackendKind>,

    /// PostgreSQL connection URL [env: SCAN_BENCH_DATABASE_URL].
    #[arg(long)]
    database_url: Option<String>,

    /// SQLite database path, or :memory: [env: SCAN_BENCH_SQLITE_PATH].
    #[arg(long)]
    sqlite_path: Option<String>,

    /// Also write the log to this file.
    #[arg(long)]
    log_file: Option<String>,

    /// Debug-level logging.
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn bench_config(&self) -> BenchConfig {
        let probes = if self.probes.is_empty() {
            ProbeKind::ALL.to_vec()
        } else {
            self.probes.clone()
        };
        BenchConfig {
            rows: self.rows,
            count_mode: self.count,
            create: self.create,
            load: self.load,
            execute: self.execute,
            partition: self.partition,
            probes,
            iterations: self.iterations,
        }
    }

    fn connection_config(&self) -> anyhow::Result<ConnectionConfig> {
        let mut config = ConnectionConfig::from_env()?;
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(url) = &self.database_url {
            config.database_url = url.clone();
        }
        if let Some(path) = &self.sqlite_path {
            config.sqlite_path = path.clone();
        }
        Ok(config)
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.bench_config();
    config.validate()?;
    let connection = cli
        .connection_config()
        .context("resolving connection settings")?;

    let mut conn = backend::connect(&connection)?;
    let outcome = driver::run(&config, conn.as_mut());
    // Release the connection before reporting, on every path.
    let closed = conn.close();

    if let Some(report) = settle(outcome, closed)? {
        print_report(&report).context("writing report")?;
    }
    Ok(())
}

/// Combine the run outcome with the result of closing the connection. A run
/// failure wins; a close failure alongside it is only logged.
fn settle(
    outcome: BenchResult<Option<TimingReport>>,
    closed: Result<(), BackendError>,
) -> anyhow::Result<Option<TimingReport>> {
    match outcome {
        Ok(report) => {
            closed.context("closing connection")?;
            Ok(report)
        }
        Err(e) => {
            if let Err(close_err) = closed {
                log::warn!("Failed to close connection: {close_err}");
            }
            Err(e.into())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    if let Err(e) = initialize_logger(level, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logger: {e:#}. Exiting.");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_bench::BenchError;

    fn close_failure() -> Result<(), BackendError> {
        Err(BackendError::Column {
            index: 0,
            message: "socket already gone".into(),
        })
    }

    #[test]
    fn run_failure_is_reported_over_close_failure() {
        let outcome = Err(BenchError::Config("iterations must be at least 1".into()));
        let err = settle(outcome, close_failure()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BenchError>(),
            Some(BenchError::Config(_))
        ));
    }

    #[test]
    fn close_failure_fails_an_otherwise_clean_run() {
        let err = settle(Ok(None), close_failure()).unwrap_err();
        assert!(format!("{err:#}").contains("closing connection"));
    }

    #[test]
    fn clean_run_and_close_pass_the_report_through() {
        assert!(settle(Ok(None), Ok(())).unwrap().is_none());
    }
}
