//! Per-pass wall-clock timing

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Accumulated timings of one named pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    samples: u32,
    total: Duration,
    min: Duration,
    max: Duration,
}

impl PassStats {
    fn record(&mut self, elapsed: Duration) {
        if self.samples == 0 || elapsed < self.min {
            self.min = elapsed;
        }
        self.max = self.max.max(elapsed);
        self.total += elapsed;
        self.samples += 1;
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn mean(&self) -> Duration {
        if self.samples == 0 {
            return Duration::ZERO;
        }
        self.total / self.samples
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

/// Times closures under a pass name and keeps per-name statistics.
#[derive(Default)]
pub struct PassProfiler {
    passes: HashMap<&'static str, PassStats>,
}

impl PassProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_pass<F, R>(&mut self, name: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.passes.entry(name).or_default().record(start.elapsed());
        result
    }

    pub fn stats(&self, name: &str) -> PassStats {
        self.passes.get(name).copied().unwrap_or_default()
    }

    /// All passes, most expensive (by total time) first.
    pub fn report(&self) -> Vec<(&'static str, PassStats)> {
        let mut rows: Vec<_> = self.passes.iter().map(|(&k, &v)| (k, v)).collect();
        rows.sort_by(|a, b| b.1.total.cmp(&a.1.total).then(a.0.cmp(b.0)));
        rows
    }

    pub fn reset(&mut self) {
        self.passes.clear();
    }
}
