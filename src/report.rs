//! Report module: the ordered per-probe durations of a run.
//!
//! Raw timings only, no min/max/percentiles. Stdout gets exactly one line of
//! tab-separated millisecond values; the labelled breakdown goes to the log.

use crate::probes::ProbeKind;
use std::io::{self, Write};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingReport {
    samples: Vec<(ProbeKind, f64)>,
}

impl TimingReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append durations for `probes`, pairing them in order.
    pub fn add_sequence(&mut self, probes: &[ProbeKind], durations_ms: &[f64]) {
        debug_assert_eq!(probes.len(), durations_ms.len());
        self.samples
            .extend(probes.iter().copied().zip(durations_ms.iter().copied()));
    }

    pub fn durations_ms(&self) -> Vec<f64> {
        self.samples.iter().map(|&(_, ms)| ms).collect()
    }

    pub fn probes(&self) -> Vec<ProbeKind> {
        self.samples.iter().map(|&(probe, _)| probe).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Durations joined by tabs, in invocation order, no trailing newline.
    pub fn tsv_line(&self) -> String {
        self.samples
            .iter()
            .map(|(_, ms)| format!("{ms:.6}"))
            .collect::<Vec<_>>()
            .join("\t")
    }

    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{}", self.tsv_line())
    }

    /// Log one labelled line per sample.
    pub fn log_breakdown(&self) {
        for (i, (probe, ms)) in self.samples.iter().enumerate() {
            log::info!("  #{:<3} {:16} {:>12.3} ms", i + 1, probe.name(), ms);
        }
    }
}

/// Write the report line to stdout.
pub fn print_report(report: &TimingReport) -> io::Result<()> {
    report.log_breakdown();
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    report.write_to(&mut lock)?;
    lock.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tsv_line_keeps_order_and_uses_tabs() {
        let mut report = TimingReport::new();
        report.add_sequence(
            &[ProbeKind::PointLookup, ProbeKind::Selectivity1],
            &[1.25, 0.5],
        );
        report.add_sequence(&[ProbeKind::PointLookup], &[3.0]);
        assert_eq!(report.tsv_line(), "1.250000\t0.500000\t3.000000");
        assert_eq!(
            report.probes(),
            vec![
                ProbeKind::PointLookup,
                ProbeKind::Selectivity1,
                ProbeKind::PointLookup
            ]
        );
    }

    #[test]
    fn write_to_emits_a_single_line() {
        let mut report = TimingReport::new();
        report.add_sequence(&[ProbeKind::FullScan], &[12.0]);
        let mut out = Vec::new();
        report.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "12.000000\n");
    }

    #[test]
    fn empty_report_prints_an_empty_line() {
        let report = TimingReport::new();
        assert!(report.is_empty());
        assert_eq!(report.tsv_line(), "");
    }
}
