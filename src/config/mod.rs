//! Configuration management for the DDoS mitigation simulator.
//!
//! This module handles loading the simulation configuration from an optional
//! configuration file and environment variables, and validating it before
//! any scenario runs.

use std::env;
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use crate::models::SimulationConfig;

/// Load configuration from the configuration file and environment variables
pub fn load_config() -> Result<SimulationConfig, ConfigError> {
    let config_file = env::var("CONFIG_FILE").unwrap_or_else(|_| "config/default.toml".to_string());

    let config = ConfigBuilder::builder()
        .set_default("network.node_count", 50)?
        .set_default("network.attacker_count", 10)?
        .set_default("network.target_node_id", 0)?
        .set_default("network.baseline_capacity", 500)?
        .set_default("network.target_capacity", 1000)?
        .set_default("traffic.attack_intensity", 2.0)?
        .set_default("traffic.legitimate_traffic", 100)?
        .set_default("thresholds.ip_filter_threshold", 100)?
        .set_default("thresholds.signature_threshold", 50)?
        .set_default("thresholds.attack_marker", "attack")?
        .set_default("thresholds.pattern_source_threshold", 200)?
        .set_default("thresholds.pattern_window_steps", 5)?
        .set_default("run.steps", 10)?
        .set_default("output.print_steps", true)?
        .add_source(File::with_name(&config_file).required(false))
        .add_source(
            Environment::with_prefix("DDOS_SIM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: SimulationConfig = config.try_deserialize()?;
    validate_config(&config)?;
    Ok(config)
}

/// Check the preconditions every scenario run relies on
pub fn validate_config(config: &SimulationConfig) -> Result<(), ConfigError> {
    let network = &config.network;
    if network.attacker_count >= network.node_count {
        return Err(ConfigError::Message(format!(
            "at least one non-attacker node is required ({} nodes, {} attackers)",
            network.node_count, network.attacker_count
        )));
    }
    if network.target_node_id >= network.node_count {
        return Err(ConfigError::Message(format!(
            "target node {} does not exist ({} nodes)",
            network.target_node_id, network.node_count
        )));
    }
    let intensity = config.traffic.attack_intensity;
    if !intensity.is_finite() || intensity < 0.0 {
        return Err(ConfigError::Message(format!(
            "attack intensity must be a finite non-negative number, got {}",
            intensity
        )));
    }
    if config.scenarios.is_empty() {
        return Err(ConfigError::Message("no scenarios configured".to_string()));
    }
    if config.scenarios.iter().any(|s| s.name.trim().is_empty()) {
        return Err(ConfigError::Message("scenario names must not be empty".to_string()));
    }
    Ok(())
}
