//! Command line front end: read a city and settings as JSON, run the
//! optimization, print the Pareto front (and optionally the weighted pick)
//! as JSON on stdout.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use parkopt::model::{City, OptimizerSettings, SelectionWeights};
use parkopt::{optimize_with, select_best};

#[derive(Parser, Debug)]
#[command(name = "parkopt")]
#[command(about = "Compute Pareto-optimal parking fee scenarios for a city")]
struct Args {
    /// Path to the city JSON document
    #[arg(long)]
    city: PathBuf,

    /// Path to the optimizer settings JSON document
    #[arg(long)]
    settings: PathBuf,

    /// Also select a single scenario, e.g. "revenue=0.5,occupancy=0.5"
    #[arg(long)]
    weights: Option<SelectionWeights>,

    /// Print per-generation progress to stderr
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let city: City = serde_json::from_str(&fs::read_to_string(&args.city)?)?;
    let settings: OptimizerSettings = serde_json::from_str(&fs::read_to_string(&args.settings)?)?;

    let scenarios = optimize_with(&city, &settings, args.verbose)?;
    println!("{}", serde_json::to_string_pretty(&scenarios)?);

    if let Some(weights) = &args.weights {
        match select_best(&scenarios, weights) {
            Some(best) => {
                eprintln!("selected scenario {}", best.scenario_id);
                println!("{}", serde_json::to_string_pretty(best)?);
            }
            None => eprintln!("empty front, nothing to select"),
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("parkopt: {e}");
            ExitCode::FAILURE
        }
    }
}
