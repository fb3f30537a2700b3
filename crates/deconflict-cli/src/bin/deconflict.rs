//! Deconflict - check drone missions against scheduled traffic.
//!
//! Usage:
//!   deconflict check --input scenario.json --mode analytic --buffer 5
//!   deconflict demo --mode sampled --seed 7
//!   deconflict trajectory --input scenario.json --flight-id F1 --time-step 0.5

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use deconflict_cli::report::{render_flights, render_json, render_text, render_trajectory_json};
use deconflict_cli::{builtin_scenarios, Config, LogFormat, Scenario};
use deconflict_core::{check_mission_with_rules, trajectory, DeconflictionRules, Dimension};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Drone mission deconfliction checks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the primary flight of a scenario file against its other flights
    Check {
        /// Scenario JSON file
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        detection: DetectionArgs,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run the built-in 2D/3D scenarios
    Demo {
        #[command(flatten)]
        detection: DetectionArgs,

        /// Seed for the random scenarios
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Export the sampled trajectory of one flight as JSON
    Trajectory {
        /// Scenario JSON file
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        flight_id: String,

        /// Seconds between samples
        #[arg(long)]
        time_step: Option<f64>,
    },
}

/// Overrides for the environment configuration.
#[derive(Args, Debug)]
struct DetectionArgs {
    /// Detection mode: sampled or analytic
    #[arg(long)]
    mode: Option<String>,

    /// Minimum separation in meters
    #[arg(long)]
    buffer: Option<f64>,

    /// Seconds between samples in sampled mode
    #[arg(long)]
    time_step: Option<f64>,
}

impl DetectionArgs {
    fn rules(&self, config: &Config) -> Result<DeconflictionRules> {
        let mut rules = config.rules();
        if let Some(mode) = &self.mode {
            rules.mode = mode.parse()?;
        }
        if let Some(buffer) = self.buffer {
            rules.buffer_m = buffer;
        }
        if let Some(time_step) = self.time_step {
            rules.time_step_s = time_step;
        }
        Ok(rules)
    }
}

fn init_tracing(format: LogFormat) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("deconflict=info".parse()?)
        .add_directive("deconflict_core=info".parse()?);

    let (text, json) = match format {
        LogFormat::Text => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .init();
    Ok(())
}

fn run_check(input: PathBuf, rules: DeconflictionRules, json: bool) -> Result<ExitCode> {
    let scenario = Scenario::load(&input)?;
    tracing::info!(
        input = %input.display(),
        primary = scenario.primary.flight_id(),
        others = scenario.others.len(),
        "Loaded scenario"
    );

    let report = check_mission_with_rules(&scenario.primary, &scenario.others, &rules)
        .context("Mission check failed")?;

    if json {
        println!("{}", render_json(&report)?);
    } else {
        print!("{}", render_text(scenario.primary.flight_id(), &report));
    }

    Ok(if report.is_safe() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

fn run_demo(rules: DeconflictionRules, seed: Option<u64>) -> Result<ExitCode> {
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(seed, mode = %rules.mode, buffer = rules.buffer_m, "Running demo scenarios");

    let mut rng = StdRng::seed_from_u64(seed);
    let scenarios = builtin_scenarios(Utc::now(), &mut rng)?;

    for scenario in &scenarios {
        let Some(primary) = scenario.primary() else {
            continue;
        };
        let dimension = match scenario.dimension {
            Dimension::TwoD => "2D",
            Dimension::ThreeD => "3D",
        };

        println!("\n--- {} [{dimension}] ---", scenario.title);
        println!("Flights:");
        print!("{}", render_flights(&scenario.flights));

        let report = check_mission_with_rules(primary, scenario.others(), &rules)
            .with_context(|| format!("Mission check failed for {}", scenario.title))?;
        println!();
        print!("{}", render_text(primary.flight_id(), &report));
    }

    Ok(ExitCode::SUCCESS)
}

fn run_trajectory(input: PathBuf, flight_id: &str, time_step: f64) -> Result<ExitCode> {
    let scenario = Scenario::load(&input)?;
    let flight = scenario
        .flight(flight_id)
        .with_context(|| format!("No flight {flight_id} in {}", input.display()))?;

    let samples: Vec<_> = trajectory(flight, time_step)?.iter().collect();
    tracing::info!(flight_id, samples = samples.len(), "Sampled trajectory");
    println!("{}", render_trajectory_json(&samples)?);
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_env().context("Invalid DECONFLICT_* environment")?;
    init_tracing(config.log_format)?;

    match cli.command {
        Command::Check {
            input,
            detection,
            json,
        } => run_check(input, detection.rules(&config)?, json),
        Command::Demo { detection, seed } => run_demo(detection.rules(&config)?, seed),
        Command::Trajectory {
            input,
            flight_id,
            time_step,
        } => run_trajectory(input, &flight_id, time_step.unwrap_or(config.time_step_s)),
    }
}
