//! Benchmark settings, optionally loaded from a JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Entities spawned before the passes start.
    pub entities: u32,
    /// Simulation steps per mode.
    pub steps: u32,
    /// Fixed timestep in seconds.
    pub dt: f32,
    /// Worker slices for the multi-threaded passes; 0 = available cores.
    pub threads: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            entities: 1_000_000,
            steps: 3,
            dt: 0.016,
            threads: 0,
        }
    }
}

impl BenchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading bench config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing bench config {}", path.display()))
    }

    pub fn worker_count(&self) -> usize {
        if self.threads > 0 {
            return self.threads;
        }
        std::thread::available_parallelism().map_or(1, |n| n.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: BenchConfig = serde_json::from_str(r#"{ "entities": 500 }"#).unwrap();
        assert_eq!(config.entities, 500);
        assert_eq!(config.steps, BenchConfig::default().steps);
        assert!(config.worker_count() >= 1);
    }
}
