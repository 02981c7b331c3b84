//! Reporting for the DDoS mitigation simulator.
//!
//! The simulation core emits one [`StepReport`] per step to a
//! [`StepReporter`]; rendering is entirely up to the reporter. This module
//! provides the console reporter and the JSON export of a comparison.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use crate::core::analytics::{ComparisonReport, ScenarioSummary, StepReport};
use crate::models::{MitigationConfig, NetworkConfig};

const SEPARATOR: &str = "----------------------------------";

/// Receiver of scenario progress
#[cfg_attr(test, mockall::automock)]
pub trait StepReporter {
    /// A scenario is about to run its first step
    fn scenario_started(&mut self, scenario: &str, mitigation: &MitigationConfig) -> io::Result<()>;
    /// A step finished
    fn step_completed(&mut self, scenario: &str, report: &StepReport) -> io::Result<()>;
    /// All steps of a scenario finished
    fn scenario_finished(&mut self, summary: &ScenarioSummary) -> io::Result<()>;
}

/// Plain text reporter
pub struct ConsoleReporter<W: Write> {
    out: W,
    print_steps: bool,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, print_steps: bool) -> Self {
        Self { out, print_steps }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print the banner with the network configuration
    pub fn banner(&mut self, network: &NetworkConfig) -> io::Result<()> {
        writeln!(self.out, "=== DDoS Attack Simulation ===")?;
        writeln!(
            self.out,
            "Network configuration: {} nodes, {} attackers, target node: {}",
            network.node_count, network.attacker_count, network.target_node_id
        )
    }

    /// Print one line per scenario comparing the outcomes
    pub fn comparison(&mut self, report: &ComparisonReport) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "=== Mitigation Comparison (seed {}) ===", report.seed)?;
        writeln!(
            self.out,
            "{:<32} {:>12} {:>12} {:>10} {:>10}",
            "Scenario", "Attack in", "Legit in", "Mitigated", "Legit loss"
        )?;
        for summary in &report.scenarios {
            writeln!(
                self.out,
                "{:<32} {:>12} {:>12} {:>9.1}% {:>9.1}%",
                summary.name,
                summary.processed.attack,
                summary.processed.legitimate,
                summary.attack_mitigation_rate * 100.0,
                summary.legitimate_loss_rate * 100.0
            )?;
        }
        Ok(())
    }
}

impl<W: Write> StepReporter for ConsoleReporter<W> {
    fn scenario_started(&mut self, scenario: &str, _mitigation: &MitigationConfig) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "=== {} ===", scenario)
    }

    fn step_completed(&mut self, _scenario: &str, report: &StepReport) -> io::Result<()> {
        if !self.print_steps {
            return Ok(());
        }
        writeln!(self.out, "Time step: {}", report.step)?;
        writeln!(
            self.out,
            "Packets processed: {} (Legitimate: {}, Attack: {})",
            report.processed.total(),
            report.processed.legitimate,
            report.processed.attack
        )?;
        writeln!(
            self.out,
            "Packets dropped: {} (Legitimate: {}, Attack: {})",
            report.dropped.total(),
            report.dropped.legitimate,
            report.dropped.attack
        )?;
        writeln!(self.out, "Target node load: {}/{}", report.target_load, report.target_capacity)?;
        writeln!(self.out, "{}", SEPARATOR)
    }

    fn scenario_finished(&mut self, summary: &ScenarioSummary) -> io::Result<()> {
        if summary.dropped_by_stage.is_empty() {
            return Ok(());
        }
        let stages = summary
            .dropped_by_stage
            .iter()
            .map(|(stage, count)| format!("{}: {}", stage.name(), count))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(self.out, "Drops by stage: {}", stages)
    }
}

/// Write a comparison report as pretty-printed JSON
pub fn write_json_report(path: impl AsRef<Path>, report: &ComparisonReport) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use chrono::Utc;
    use uuid::Uuid;
    use crate::core::mitigation::FilterStage;
    use crate::models::{TrafficConfig, TrafficCount};

    fn step_report() -> StepReport {
        StepReport {
            step: 3,
            batch_size: 11_100,
            processed: TrafficCount { legitimate: 100, attack: 900 },
            dropped: TrafficCount { legitimate: 0, attack: 10_100 },
            dropped_by_stage: BTreeMap::from([(FilterStage::RateLimiting, 10_100)]),
            target_id: 0,
            target_load: 1000,
            target_capacity: 1000,
        }
    }

    fn summary() -> ScenarioSummary {
        ScenarioSummary {
            run_id: Uuid::new_v4(),
            name: "With Rate Limiting".to_string(),
            mitigation: MitigationConfig { rate_limiting: true, ..MitigationConfig::default() },
            processed: TrafficCount { legitimate: 100, attack: 900 },
            dropped: TrafficCount { legitimate: 0, attack: 10_100 },
            dropped_by_stage: BTreeMap::from([(FilterStage::RateLimiting, 10_100)]),
            attack_mitigation_rate: 10_100.0 / 11_000.0,
            legitimate_loss_rate: 0.0,
            peak_target_load: 1000,
            target_capacity: 1000,
            steps: vec![step_report()],
        }
    }

    #[test]
    fn test_console_step_layout() {
        let mut reporter = ConsoleReporter::new(Vec::new(), true);

        reporter.scenario_started("With Rate Limiting", &MitigationConfig::default()).unwrap();
        reporter.step_completed("With Rate Limiting", &step_report()).unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            output,
            "\n=== With Rate Limiting ===\n\
             Time step: 3\n\
             Packets processed: 1000 (Legitimate: 100, Attack: 900)\n\
             Packets dropped: 10100 (Legitimate: 0, Attack: 10100)\n\
             Target node load: 1000/1000\n\
             ----------------------------------\n"
        );
    }

    #[test]
    fn test_console_quiet_steps() {
        let mut reporter = ConsoleReporter::new(Vec::new(), false);

        reporter.step_completed("x", &step_report()).unwrap();
        reporter.scenario_finished(&summary()).unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(output, "Drops by stage: rate limiting: 10100\n");
    }

    #[test]
    fn test_console_banner_and_comparison() {
        let mut reporter = ConsoleReporter::new(Vec::new(), true);
        let report = ComparisonReport {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            seed: 5,
            network: NetworkConfig::default(),
            traffic: TrafficConfig::default(),
            scenarios: vec![summary()],
        };

        reporter.banner(&report.network).unwrap();
        reporter.comparison(&report).unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.starts_with(
            "=== DDoS Attack Simulation ===\nNetwork configuration: 50 nodes, 10 attackers, target node: 0\n"
        ));
        assert!(output.contains("=== Mitigation Comparison (seed 5) ==="));
        assert!(output.contains("With Rate Limiting"));
        assert!(output.contains("91.8%"));
    }

    #[test]
    fn test_json_report_round_trip() {
        let path = std::env::temp_dir().join(format!("ddos-sim-{}.json", Uuid::new_v4()));
        let report = ComparisonReport {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            seed: 5,
            network: NetworkConfig::default(),
            traffic: TrafficConfig::default(),
            scenarios: vec![summary()],
        };

        write_json_report(&path, &report).unwrap();
        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(json["seed"], 5);
        assert_eq!(json["scenarios"][0]["name"], "With Rate Limiting");
        assert_eq!(json["scenarios"][0]["dropped_by_stage"]["RateLimiting"], 10_100);
        assert_eq!(json["scenarios"][0]["steps"][0]["target_load"], 1000);
    }
}
