//! DDoS Mitigation Simulator
//!
//! This is the main entry point for the simulator.
//! It loads the configuration, runs every configured scenario and prints
//! the comparison.

use std::io;
use anyhow::{Context, Result};
use dotenv::dotenv;
use log::info;
use ddos_mitigation_sim::config;
use ddos_mitigation_sim::core::run_comparison;
use ddos_mitigation_sim::report::{write_json_report, ConsoleReporter};

fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    info!("Starting DDoS mitigation simulator...");

    let config = config::load_config().context("Failed to load configuration")?;

    let seed = config.run.seed.unwrap_or_else(rand::random);
    info!("Using seed {}", seed);

    let stdout = io::stdout();
    let mut reporter = ConsoleReporter::new(stdout.lock(), config.output.print_steps);
    reporter.banner(&config.network)?;

    let report = run_comparison(&config, seed, &mut reporter).context("Simulation failed")?;
    reporter.comparison(&report)?;

    if let Some(path) = &config.output.json_path {
        write_json_report(path, &report).with_context(|| format!("Failed to write report to {}", path))?;
        info!("Wrote JSON report to {}", path);
    }

    Ok(())
}
