//! CLI entry point for the lookup-table simulator.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lut_core::{AccessMode, Tick, DEFAULT_LATENCY_TICKS};
use lut_sim::{run_scenario, Backpressure, Scenario, SimError};
use serde as _;
use serde_json as _;
#[cfg(test)]
use tempfile as _;
use thiserror as _;

#[derive(Debug, Parser)]
#[command(name = "lut-sim", version, about = "Drive the lookup-table device model")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the built-in probe program against the default table.
    Demo(DemoArgs),
    /// Run a scenario file.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct DemoArgs {
    /// Access path used for every request.
    #[arg(long, value_enum, default_value_t = ModeArg::Timing)]
    mode: ModeArg,
    /// Device latency in ticks.
    #[arg(long, default_value_t = DEFAULT_LATENCY_TICKS)]
    latency: Tick,
    /// Times the requester refuses each timing response.
    #[arg(long, default_value_t = 0)]
    reject_first: u32,
    /// Ticks between a refusal and the retry signal.
    #[arg(long, default_value_t = 0)]
    retry_delay: Tick,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Scenario JSON file.
    scenario: PathBuf,
    /// Override the scenario's access mode.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Functional,
    Atomic,
    Timing,
}

impl From<ModeArg> for AccessMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Functional => Self::Functional,
            ModeArg::Atomic => Self::Atomic,
            ModeArg::Timing => Self::Timing,
        }
    }
}

fn demo_scenario(args: &DemoArgs) -> Scenario {
    let mut scenario = Scenario::reference_harness(args.mode.into());
    scenario.device = scenario.device.with_latency(args.latency);
    scenario.backpressure = Backpressure {
        reject_first: args.reject_first,
        retry_delay: args.retry_delay,
    };
    scenario
}

fn execute(command: Command) -> Result<(), SimError> {
    let (scenario, json) = match command {
        Command::Demo(args) => (demo_scenario(&args), args.json),
        Command::Run(args) => {
            let mut scenario = Scenario::load(&args.scenario)?;
            if let Some(mode) = args.mode {
                scenario.mode = mode.into();
            }
            (scenario, args.json)
        }
    };

    let report = run_scenario(&scenario)?;
    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
