//! Timing harness: wall-clock duration around each probe invocation.

use std::time::{Duration, Instant};

/// A timed unit of work run against some shared context `C`.
pub type TimedProbe<'a, C, E> = Box<dyn Fn(&mut C) -> Result<(), E> + 'a>;

pub fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1e3
}

/// Run `probe` once and return its elapsed time in fractional milliseconds.
///
/// A failing probe yields its error; no duration is recorded for it.
pub fn time_ms<E>(probe: impl FnOnce() -> Result<(), E>) -> Result<f64, E> {
    let start = Instant::now();
    probe()?;
    Ok(duration_ms(start.elapsed()))
}

/// Time each probe in order, stopping at the first failure.
///
/// The returned durations are in invocation order.
pub fn run_sequence<C: ?Sized, E>(
    ctx: &mut C,
    probes: &[TimedProbe<'_, C, E>],
) -> Result<Vec<f64>, E> {
    let mut durations = Vec::with_capacity(probes.len());
    for probe in probes {
        durations.push(time_ms(|| probe(&mut *ctx))?);
    }
    Ok(durations)
}
