//! Headless runner for the patrol assignment evolution.
//!
//! Reads a scenario from a file (`-f`) or generates a random timing table
//! from eight parameters (`-r`), runs it to completion, and prints every
//! observation to stdout. Logs go to stderr, filtered by `RUST_LOG`.
//!
//! Usage:
//!   patrolsim -f scenario.txt
//!   patrolsim -r 3 5 100 10 50 1.0 1.0 1.0 --seed 7
//!   RUST_LOG=debug patrolsim -f scenario.txt --json

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use patrolsim_logic::input::Parameters;
use patrolsim_logic::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod output;

#[derive(Parser, Debug)]
#[command(name = "patrolsim")]
#[command(about = "Evolve patrol-to-system assignments with a discrete-event simulation")]
#[command(group(ArgGroup::new("input").required(true).args(["file", "random"])))]
struct Args {
    /// Scenario file: `n m tau nu nuMax mu rho delta` followed by the n x m timing table
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// Generate a random timing table (times 1-10) from the eight parameters
    #[arg(
        short = 'r',
        long,
        num_args = 8,
        value_names = ["N", "M", "TAU", "NU", "NU_MAX", "MU", "RHO", "DELTA"],
        allow_negative_numbers = true
    )]
    random: Option<Vec<String>>,

    /// Seed for the simulation (and for the random timing table)
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Base configuration as JSON; scenario parameters override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// How an overcrowded population is culled
    #[arg(long, value_enum)]
    epidemic: Option<Epidemic>,

    /// Stop after this many events
    #[arg(long)]
    max_events: Option<u64>,

    /// Keep running even after a perfect allocation is found
    #[arg(long)]
    no_target: bool,

    /// Print the final report as JSON instead of the observation log
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Epidemic {
    CullWeakest,
    Stochastic,
}

impl From<Epidemic> for EpidemicPolicy {
    fn from(value: Epidemic) -> Self {
        match value {
            Epidemic::CullWeakest => EpidemicPolicy::CullWeakest,
            Epidemic::Stochastic => EpidemicPolicy::Stochastic,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let scenario = load_scenario(&args)?;
    let empire = scenario.empire().context("invalid timing table")?;
    let config = scenario.config(base_config(&args)?);

    let errors = config.validate();
    if !errors.is_empty() {
        for error in &errors {
            log::error!("{}", error);
        }
        bail!("{} configuration error(s)", errors.len());
    }

    log::info!(
        "Running {} patrols x {} systems until t={} (seed {})",
        empire.patrol_count(),
        empire.system_count(),
        config.horizon,
        config.seed
    );

    let mut simulation = Simulation::new(empire, config)?;
    simulation.seed_population();
    let report = simulation.run();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for observation in &report.observations {
            print!("{}", output::format_observation(observation));
        }
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_scenario(args: &Args) -> Result<Scenario> {
    if let Some(path) = &args.file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        return Scenario::parse(&text).with_context(|| format!("parsing {}", path.display()));
    }

    let values = args.random.as_deref().unwrap_or_default();
    let mut tokens = values.iter().map(String::as_str);
    let parameters = Parameters::parse(&mut tokens).context("parsing -r parameters")?;
    let mut rng = StdRng::seed_from_u64(args.seed);
    Ok(Scenario::random(parameters, &mut rng))
}

fn base_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    config.seed = args.seed;
    if let Some(epidemic) = args.epidemic {
        config.epidemic = epidemic.into();
    }
    if args.max_events.is_some() {
        config.max_events = args.max_events;
    }
    if args.no_target {
        config.target_comfort = None;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_args_parse() {
        let args = Args::try_parse_from([
            "patrolsim", "-r", "3", "5", "20", "4", "10", "1.0", "1.0", "1.0", "--seed", "9",
        ])
        .unwrap();
        let scenario = load_scenario(&args).unwrap();
        assert_eq!(scenario.parameters.patrols, 3);
        assert_eq!(scenario.times.len(), 3);
        assert_eq!(base_config(&args).unwrap().seed, 9);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["patrolsim"]).is_err());
        let both = [
            "patrolsim", "-f", "a.txt", "-r", "1", "1", "1", "1", "1", "1", "1", "1",
        ];
        assert!(Args::try_parse_from(both).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "patrolsim",
            "-r",
            "2",
            "2",
            "5",
            "1",
            "1",
            "1",
            "1",
            "1",
            "--epidemic",
            "stochastic",
            "--max-events",
            "12",
            "--no-target",
        ])
        .unwrap();
        let config = base_config(&args).unwrap();
        assert_eq!(config.epidemic, EpidemicPolicy::Stochastic);
        assert_eq!(config.max_events, Some(12));
        assert_eq!(config.target_comfort, None);
    }
}
