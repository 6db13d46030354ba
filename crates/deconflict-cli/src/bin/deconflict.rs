//! Validate a primary mission against scheduled traffic.
//!
//! Usage:
//!   cargo run -p deconflict-cli --bin deconflict -- --mission mission.json
//!   cargo run -p deconflict-cli --bin deconflict -- --scenario staggered --json
//!
//! Exit code: 0 clear, 2 conflict, 1 error.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use deconflict_cli::{init_tracing, report, scenarios, Config, MissionFile};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Strategic deconfliction check for a drone mission")]
struct Args {
    /// Mission file (JSON). Runs a built-in scenario when omitted.
    #[arg(long)]
    mission: Option<PathBuf>,

    /// Built-in scenario to run without a mission file
    #[arg(long, default_value = "crossing")]
    scenario: String,

    /// Minimum allowed separation; overrides mission file and environment
    #[arg(long)]
    buffer: Option<f64>,

    /// Sample time step; overrides mission file and environment
    #[arg(long)]
    resolution: Option<f64>,

    /// Evaluate scheduled flights in parallel
    #[arg(long)]
    parallel: bool,

    /// Print the result as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// List built-in scenarios and exit
    #[arg(long)]
    list_scenarios: bool,
}

fn main() -> Result<ExitCode> {
    init_tracing("deconflict")?;
    let args = Args::parse();

    if args.list_scenarios {
        for scenario in scenarios::SCENARIOS {
            println!("{:<12} {}", scenario.name, scenario.description);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mission = match &args.mission {
        Some(path) => MissionFile::load(path)?,
        None => scenarios::find(&args.scenario)
            .ok_or_else(|| anyhow!("unknown scenario '{}'", args.scenario))?
            .mission(),
    };

    let flags = Config {
        safety_buffer: args.buffer,
        sample_resolution: args.resolution,
        parallel: args.parallel.then_some(true),
    };
    let config = Config::resolve(&[Config::from_env(), mission.config_layer(), flags]);

    let engine = mission.build_engine()?;
    let primary = mission
        .primary
        .to_flight()
        .with_context(|| format!("primary flight '{}'", mission.primary.id))?;

    tracing::info!(
        mission = %primary.id(),
        scheduled = engine.len(),
        buffer = config.safety_buffer,
        resolution = config.sample_resolution,
        "Validating mission"
    );

    let result = engine.validate_with(primary.trajectory(), primary.start_time(), &config)?;

    if args.json {
        println!("{}", report::render_json(primary.id(), &result)?);
    } else {
        print!(
            "{}",
            report::render_text(primary.id(), primary.start_time(), &result)
        );
    }

    Ok(ExitCode::from(report::exit_code(&result)))
}
