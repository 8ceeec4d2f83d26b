// SPDX-License-Identifier: MIT OR Apache-2.0
//! Railbeat - audio-driven train runner
//!
//! Headless driver for a level: the train's position follows the music
//! through each track's beat path, while a small state machine handles
//! jumping, ducking and honking past obstacles.
//!
//! Logging is controlled through `RUST_LOG`.

use clap::Parser;
use railbeat_app::{run_headless, ConfigError, GameConfig, GameSession, InputScript, RunOptions};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "railbeat_app=debug,railbeat_timeline=debug,railbeat_train=debug";

#[derive(Parser, Debug)]
#[command(name = "railbeat", version)]
#[command(about = "Run a Railbeat level headless against simulated audio")]
struct Args {
    /// Level file (RON)
    level: PathBuf,

    /// Input script to play back (RON); no input when omitted
    script: Option<PathBuf>,

    /// Stop after this many simulated seconds
    #[arg(long)]
    max_secs: Option<f32>,

    /// Fixed simulation steps per second
    #[arg(long, default_value_t = 60)]
    steps_per_second: u32,

    /// Simulation speed relative to the frame clock
    #[arg(long, default_value_t = 1.0)]
    time_scale: f32,
}

impl Args {
    fn run_options(&self) -> RunOptions {
        let mut options = RunOptions {
            steps_per_second: self.steps_per_second,
            time_scale: self.time_scale,
            ..RunOptions::default()
        };
        if let Some(max_secs) = self.max_secs {
            options.max_secs = max_secs;
        }
        options
    }
}

fn run(args: &Args) -> Result<(), ConfigError> {
    let config = GameConfig::load(&args.level)?;
    let script = match &args.script {
        Some(path) => InputScript::load(path)?,
        None => InputScript::default(),
    };

    let mut session = GameSession::simulated(&config)?;
    let summary = run_headless(&mut session, &script, &args.run_options());
    tracing::info!(
        "Level '{}': {} frames, {} steps, final position {:?}",
        config.name,
        summary.frames,
        summary.steps,
        summary.final_position
    );
    Ok(())
}

fn main() {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Railbeat v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        tracing::error!("Run failed: {e}");
        std::process::exit(1);
    }
}
