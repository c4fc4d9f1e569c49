mod cli;

use anyhow::Result;
use clap::Parser;
use pqc_sim::builtin::encoding_pqc;
use pqc_sim::config::Config;
use pqc_sim::{Circuit, Device, StateVectorDevice};
use tracing::{debug, Level};

use crate::cli::Cli;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::resolve(cli.config.as_deref())?;
    if cli.shots.is_some() {
        config.device.shots = cli.shots;
    }
    if cli.seed.is_some() {
        config.device.seed = cli.seed;
    }
    debug!(?config, "resolved configuration");

    let circuit = match &cli.circuit {
        Some(path) => Circuit::load(path)?,
        None => encoding_pqc()?,
    };
    debug!("circuit:\n{}", circuit);

    let device = StateVectorDevice::from_config(&config.device)?;

    if cli.state {
        print!("{}", device.state(&circuit)?);
    }
    if cli.probs {
        let probs = device.probs(&circuit)?;
        if cli.json {
            println!("{}", serde_json::to_string(&probs)?);
        } else {
            let width = circuit.num_of_qbits();
            for (i, p) in probs.iter().enumerate() {
                println!("|{:0width$b}>: {:.8}", i, p, width = width);
            }
        }
    }

    let expectations = device.run(&circuit)?;
    if cli.json {
        println!("{}", serde_json::to_string(&expectations)?);
    } else {
        let values = expectations
            .iter()
            .map(|v| format!("{:.8}", v))
            .collect::<Vec<_>>();
        println!("[{}]", values.join(", "));
    }

    Ok(())
}
