use log::{log_enabled, warn, Level};
use std::time::{Duration, Instant};

/// Scoped timer for the phases of a tick. Emits `trace` records and, when
/// given a sink, adds the elapsed time to it on drop.
pub struct ScopedTimer<'a> {
    label: &'a str,
    start: Instant,
    sink: Option<&'a mut Duration>,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'a str) -> Self {
        if log_enabled!(Level::Trace) {
            log::trace!("start {label}");
        }
        Self {
            label,
            start: Instant::now(),
            sink: None,
        }
    }

    pub fn recording(label: &'a str, sink: &'a mut Duration) -> Self {
        let mut timer = Self::new(label);
        timer.sink = Some(sink);
        timer
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        if let Some(sink) = self.sink.as_deref_mut() {
            *sink += elapsed;
        }
        if log_enabled!(Level::Trace) {
            log::trace!("end {} ({} µs)", self.label, elapsed.as_micros());
        }
    }
}

/// Warns when a tick took longer than the real-time budget allows.
pub fn warn_if_frame_budget_exceeded(duration: Duration, budget: Duration) -> bool {
    if duration > budget {
        warn!(
            "Tick exceeded budget: {:.2} ms > {:.2} ms",
            duration.as_secs_f64() * 1000.0,
            budget.as_secs_f64() * 1000.0
        );
        true
    } else {
        false
    }
}
