//! Random-traffic load run.
//!
//! Registers N random flights, validates a diagonal candidate sequentially and in
//! parallel, and checks both passes agree.

use anyhow::{ensure, Result};
use clap::Parser;
use deconflict_cli::init_tracing;
use deconflict_cli::scenarios::{random_traffic, TrafficArea};
use deconflict_core::{DeconflictionEngine, Trajectory, ValidationConfig, Waypoint};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Validate a candidate against random scheduled traffic")]
struct Args {
    /// Number of scheduled flights
    #[arg(long, default_value_t = 2_000)]
    flights: usize,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Side length of the square traffic area
    #[arg(long, default_value_t = 1_000.0)]
    extent: f64,

    /// Departure window for scheduled flights
    #[arg(long, default_value_t = 600.0)]
    horizon: f64,

    #[arg(long, default_value_t = 5.0)]
    buffer: f64,

    #[arg(long, default_value_t = 0.5)]
    resolution: f64,
}

fn main() -> Result<()> {
    init_tracing("traffic_stress")?;
    let args = Args::parse();

    let area = TrafficArea {
        extent: args.extent,
        horizon: args.horizon,
        ..TrafficArea::default()
    };

    let engine = DeconflictionEngine::new();
    for flight in random_traffic(args.flights, args.seed, &area)? {
        engine.register(flight)?;
    }

    let candidate = Trajectory::new(
        vec![
            Waypoint::new(0.0, 0.0, area.min_altitude),
            Waypoint::new(area.extent, area.extent, area.max_altitude),
        ],
        12.0,
    )?;
    let start = area.horizon / 2.0;
    let sequential = ValidationConfig::new(args.buffer, args.resolution);
    let parallel = sequential.with_parallel(true);

    let timer = Instant::now();
    let expected = engine.validate_with(&candidate, start, &sequential)?;
    let sequential_ms = timer.elapsed().as_secs_f64() * 1000.0;

    let timer = Instant::now();
    let actual = engine.validate_with(&candidate, start, &parallel)?;
    let parallel_ms = timer.elapsed().as_secs_f64() * 1000.0;

    ensure!(
        expected == actual,
        "parallel result differs from sequential result"
    );

    tracing::info!(
        flights = engine.len(),
        duration_s = candidate.duration(),
        conflicts = expected.conflicts().len(),
        "Stress run complete"
    );
    println!("Scheduled flights: {}", engine.len());
    println!("Status: {} ({} conflicts)", expected.status(), expected.conflicts().len());
    println!("Sequential: {sequential_ms:.2}ms | Parallel: {parallel_ms:.2}ms");

    Ok(())
}
