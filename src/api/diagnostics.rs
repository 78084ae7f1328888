//! Optional timing and summary logging for the extraction entry points.

use std::time::Instant;

/// Optional logging of the total and per-stage run time of one extraction call.
pub(crate) struct Diagnostics {
    strategy: &'static str,
    result_log: bool,
    time_log: bool,
    start: Instant,
    stage_start: Instant,
}

impl Diagnostics {
    pub(crate) fn new(strategy: &'static str, result_log: bool, time_log: bool) -> Self {
        let now = Instant::now();
        Self {
            strategy,
            result_log,
            time_log,
            start: now,
            stage_start: now,
        }
    }

    /// Marks the end of a stage, logging how long it took if `time_log` is set.
    pub(crate) fn stage(&mut self, stage: &str) {
        if self.time_log {
            let now = Instant::now();
            log::debug!(
                "{} {stage}: {:.3}ms",
                self.strategy,
                now.duration_since(self.stage_start).as_secs_f64() * 1000.0,
            );
            self.stage_start = now;
        }
    }

    pub(crate) fn finish(&self, num_colors: usize, num_samples: u32) {
        if self.result_log {
            log::info!(
                "{}: {num_colors} colors from {num_samples} samples in {:.3}ms",
                self.strategy,
                self.start.elapsed().as_secs_f64() * 1000.0,
            );
        }
    }
}
