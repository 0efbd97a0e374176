use std::fs;

use anyhow::Context;
use clap::Parser;

use meme_presale_sim::{SaleSettings, Scenario, Simulation};

#[derive(Parser, Debug)]
#[command(name = "meme-presale-sim")]
#[command(about = "Replay presale scenarios against the sale rules")]
struct Args {
    /// Path to sale settings file
    #[arg(short, long, default_value = "sale.toml")]
    config: String,

    /// Path to scenario file
    #[arg(short, long)]
    scenario: String,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    let settings = SaleSettings::load(&args.config)?;
    log::info!("Loaded sale settings from {}", args.config);

    let scenario = Scenario::load(&args.scenario)?;
    let mut simulation = Simulation::new(settings)?;
    let report = simulation.run(&scenario)?;

    if report.rejected() > 0 {
        log::warn!("{} steps were rejected by the sale", report.rejected());
    }

    let json = report.to_json().context("failed to serialize report")?;
    match args.output {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("failed to write report to {path}"))?;
            log::info!("Report written to {}", path);
        }
        None => println!("{json}"),
    }
    Ok(())
}
