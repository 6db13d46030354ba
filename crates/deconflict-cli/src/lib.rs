//! Deconfliction CLI - mission loading and reporting around `deconflict-core`.
//!
//! Binaries:
//! - deconflict: validate a mission file or a built-in scenario
//! - traffic_stress: random-traffic load run, sequential vs parallel

pub mod config;
pub mod mission;
pub mod report;
pub mod scenarios;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::Config;
pub use mission::{FlightSpec, MissionFile, StartTime};

/// Install the stderr log subscriber. `RUST_LOG` adds directives on top of the
/// `info` default for this crate and the calling binary.
pub fn init_tracing(binary: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("deconflict_cli=info".parse()?)
                .add_directive(format!("{binary}=info").parse()?),
        )
        .init();
    Ok(())
}
