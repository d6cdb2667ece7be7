//! Strata Runtime
//!
//! Walks through the store API, then times single-threaded view passes
//! against multi-threaded alive-list passes.

mod bench;
mod config;
mod demo;

use anyhow::Result;
use config::BenchConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Strata v{}", strata_core::VERSION);

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => BenchConfig::load(&path)?,
        None => BenchConfig::default(),
    };

    demo::run();
    let report = bench::run(&config);
    report.log(&config);

    Ok(())
}
