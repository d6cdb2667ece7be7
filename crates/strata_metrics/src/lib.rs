//! Strata Metrics - pass timing and event counters
//!
//! Everything here compiles down to no-ops unless the `metrics` feature is
//! enabled, so instrumented code pays nothing in production builds.
//!
//! ```ignore
//! use strata_metrics::PassProfiler;
//!
//! let mut profiler = PassProfiler::new();
//! for _ in 0..steps {
//!     profiler.time_pass("integrate", || integrate(&mut store));
//! }
//! for (name, stats) in profiler.report() {
//!     println!("{name}: {:?} avg", stats.mean());
//! }
//! ```

#[cfg(feature = "metrics")]
mod counter;
#[cfg(feature = "metrics")]
mod profiler;

#[cfg(feature = "metrics")]
pub use counter::Counters;
#[cfg(feature = "metrics")]
pub use profiler::{PassProfiler, PassStats};

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats;

#[cfg(not(feature = "metrics"))]
impl PassStats {
    pub fn samples(&self) -> u32 { 0 }
    pub fn total(&self) -> std::time::Duration { std::time::Duration::ZERO }
    pub fn mean(&self) -> std::time::Duration { std::time::Duration::ZERO }
    pub fn min(&self) -> std::time::Duration { std::time::Duration::ZERO }
    pub fn max(&self) -> std::time::Duration { std::time::Duration::ZERO }
}

#[cfg(not(feature = "metrics"))]
#[derive(Default)]
pub struct PassProfiler;

#[cfg(not(feature = "metrics"))]
impl PassProfiler {
    pub fn new() -> Self { Self }
    pub fn time_pass<F, R>(&mut self, _name: &'static str, f: F) -> R where F: FnOnce() -> R { f() }
    pub fn stats(&self, _name: &str) -> PassStats { PassStats }
    pub fn report(&self) -> Vec<(&'static str, PassStats)> { Vec::new() }
    pub fn reset(&mut self) {}
}

#[cfg(not(feature = "metrics"))]
#[derive(Default)]
pub struct Counters;

#[cfg(not(feature = "metrics"))]
impl Counters {
    pub fn new() -> Self { Self }
    pub fn add(&mut self, _name: &'static str, _value: u64) {}
    pub fn get(&self, _name: &str) -> u64 { 0 }
    pub fn snapshot(&self) -> Vec<(&'static str, u64)> { Vec::new() }
}

#[cfg(test)]
mod tests {
    #[cfg(not(feature = "metrics"))]
    #[test]
    fn stubs_pass_results_through() {
        let mut profiler = super::PassProfiler::new();
        assert_eq!(profiler.time_pass("noop", || 7), 7);
        assert!(profiler.report().is_empty());

        let mut counters = super::Counters::new();
        counters.add("spawned", 3);
        assert_eq!(counters.get("spawned"), 0);
    }
}
