//! Scan-Path Micro-Benchmark
//!
//! Provisions a fixed four-column table, bulk-loads a deterministic synthetic
//! dataset, and times a battery of scan probes at varying selectivity:
//!
//! - full scan
//! - range scans matching 1%, 10% and 50% of the rows
//! - a single-row point lookup
//!
//! Every probe checks its own result shape against the known data
//! distribution, so a timing is only reported for a correct answer.
//!
//! Run against PostgreSQL: `cargo run --release -- --rows 100000`
//! Run tests: `cargo test`

pub mod backend;
pub mod config;
pub mod driver;
pub mod error;
pub mod loader;
pub mod logging;
pub mod populate;
pub mod probes;
pub mod report;
pub mod schema;
pub mod timing;

pub use error::{BenchError, BenchResult};
