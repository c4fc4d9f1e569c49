use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "pqc-sim",
    about = "Run a parameterised quantum circuit and print <Z> on every qubit",
    version
)]
pub struct Cli {
    /// Circuit description (TOML); the built-in 5-qubit classifier when omitted
    #[arg(short = 'c', long = "circuit", value_name = "FILE")]
    pub circuit: Option<PathBuf>,

    /// Device settings (TOML)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Estimate expectation values from this many samples instead of exactly
    #[arg(long = "shots", value_name = "N")]
    pub shots: Option<usize>,

    /// Seed for sampling
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Print the final state vector
    #[arg(long = "state", action = ArgAction::SetTrue)]
    pub state: bool,

    /// Print basis state probabilities
    #[arg(long = "probs", action = ArgAction::SetTrue)]
    pub probs: bool,

    /// Print results as JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    pub json: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}
