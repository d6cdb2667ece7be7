// bench.rs - Single- vs multi-threaded simulation passes
//
// Every entity carries Position, Velocity, Accel and Health. The
// single-threaded mode drives each system through a cached view; the
// multi-threaded mode partitions the alive list across workers.

use crate::config::BenchConfig;
use glam::Vec2;
use std::time::{Duration, Instant};
use strata_core::{register, Entity, Store, StoreConfig};
use strata_metrics::{Counters, PassProfiler};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vec2);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accel(pub Vec2);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health(pub f32);

const HEALTH_DECAY_PER_SEC: f32 = 10.0;

pub struct BenchReport {
    pub setup: Duration,
    pub single_threaded: Duration,
    pub multi_threaded: Duration,
    pub workers: usize,
    pub checksum: f64,
    profiler: PassProfiler,
    counters: Counters,
}

impl BenchReport {
    pub fn log(&self, config: &BenchConfig) {
        tracing::info!(entities = config.entities, "setup: {:?}", self.setup);
        tracing::info!(steps = config.steps, "single-threaded: {:?}", self.single_threaded);
        tracing::info!(
            steps = config.steps,
            workers = self.workers,
            "multi-threaded: {:?}",
            self.multi_threaded
        );
        for (pass, stats) in self.profiler.report() {
            tracing::info!(
                pass,
                samples = stats.samples(),
                mean = ?stats.mean(),
                max = ?stats.max(),
                "pass timing"
            );
        }
        for (name, value) in self.counters.snapshot() {
            tracing::debug!(counter = name, value);
        }
        tracing::info!("checksum: {}", self.checksum);
    }
}

pub fn run(config: &BenchConfig) -> BenchReport {
    let mut profiler = PassProfiler::new();
    let mut counters = Counters::new();
    let workers = config.worker_count();

    let start = Instant::now();
    let mut store = populate(config.entities);
    let setup = start.elapsed();
    counters.add("entities", store.alive_count() as u64);

    // Build the cache up front so the first timed pass is not a rebuild.
    store.view::<(Position, Velocity)>().each(|_, _| {});

    let dt = config.dt;
    let start = Instant::now();
    for _ in 0..config.steps {
        profiler.time_pass("st.apply_accel", || apply_accel(&mut store, dt));
        profiler.time_pass("st.integrate", || integrate(&mut store, dt));
        profiler.time_pass("st.health_decay", || health_decay(&mut store, dt));
    }
    let single_threaded = start.elapsed();

    let start = Instant::now();
    for _ in 0..config.steps {
        profiler.time_pass("mt.apply_accel", || apply_accel_par(&mut store, dt, workers));
        profiler.time_pass("mt.integrate", || integrate_par(&mut store, dt, workers));
        profiler.time_pass("mt.health_decay", || health_decay_par(&mut store, dt, workers));
    }
    let multi_threaded = start.elapsed();
    counters.add("steps", 2 * u64::from(config.steps));

    BenchReport {
        setup,
        single_threaded,
        multi_threaded,
        workers,
        checksum: checksum(&store),
        profiler,
        counters,
    }
}

/// Create `count` entities with deterministic starting values.
pub fn populate(count: u32) -> Store {
    let mut store = Store::with_config(StoreConfig::default().with_max_entities(count));
    register!(store, Position, Velocity, Accel, Health);

    for i in 0..count {
        let f = Vec2::new((i % 1000) as f32, ((i / 1000) % 1000) as f32) * 0.001;
        let e = store.create();
        store.add_component(e, Position(f));
        store.add_component(e, Velocity(f * 0.5 + Vec2::new(0.01, 0.02)));
        store.add_component(e, Accel(Vec2::new(0.0001, -0.0002) + f * 0.00001));
        store.add_component(e, Health(100.0));
    }
    store
}

fn decay(health: &mut Health, dt: f32) {
    health.0 = (health.0 - HEALTH_DECAY_PER_SEC * dt).max(0.0);
}

fn apply_accel(store: &mut Store, dt: f32) {
    store
        .view::<(Velocity, Accel)>()
        .each(|_, (vel, accel)| vel.0 += accel.0 * dt);
}

fn integrate(store: &mut Store, dt: f32) {
    store
        .view::<(Position, Velocity)>()
        .each(|_, (pos, vel)| pos.0 += vel.0 * dt);
}

fn health_decay(store: &mut Store, dt: f32) {
    store.view::<(Health,)>().each(|_, (health,)| decay(health, dt));
}

fn apply_accel_par(store: &mut Store, dt: f32, workers: usize) {
    store.par_for_each::<(Velocity, Accel), _>(workers, |_, (vel, accel)| vel.0 += accel.0 * dt);
}

fn integrate_par(store: &mut Store, dt: f32, workers: usize) {
    store.par_for_each::<(Position, Velocity), _>(workers, |_, (pos, vel)| pos.0 += vel.0 * dt);
}

fn health_decay_par(store: &mut Store, dt: f32, workers: usize) {
    store.par_for_each::<(Health,), _>(workers, |_, (health,)| decay(health, dt));
}

/// Sum position and health over up to 1000 evenly spaced alive entities.
pub fn checksum(store: &Store) -> f64 {
    let alive = store.alive();
    if alive.is_empty() {
        return 0.0;
    }
    let stride = (alive.len() / 1000).max(1);
    alive
        .iter()
        .step_by(stride)
        .take(1000)
        .map(|&e: &Entity| {
            let pos = store.get_component::<Position>(e).map_or(Vec2::ZERO, |p| p.0);
            let hp = store.get_component::<Health>(e).map_or(0.0, |h| h.0);
            f64::from(pos.x) + f64::from(pos.y) + f64::from(hp)
        })
        .sum()
}
