//! Statistics for the DDoS mitigation simulator.
//!
//! This module turns pipeline outcomes into per-step reports, aggregates
//! them into a scenario summary and records them as metrics.

use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::mitigation::{FilterStage, StepOutcome};
use crate::core::node_registry::Node;
use crate::models::{MitigationConfig, NetworkConfig, NodeId, TrafficConfig, TrafficCount};
use crate::utils::ratio;

/// Statistics of one simulation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: u64,
    pub batch_size: u64,
    pub processed: TrafficCount,
    pub dropped: TrafficCount,
    pub dropped_by_stage: BTreeMap<FilterStage, u64>,
    pub target_id: NodeId,
    /// Target load at the end of the step
    pub target_load: u64,
    pub target_capacity: u64,
}

impl StepReport {
    pub fn new(step: u64, outcome: StepOutcome, target: &Node) -> Self {
        Self {
            step,
            batch_size: outcome.batch_size(),
            processed: outcome.processed,
            dropped: outcome.dropped,
            dropped_by_stage: outcome.dropped_by_stage,
            target_id: target.id,
            target_load: target.current_load,
            target_capacity: target.capacity,
        }
    }
}

/// Aggregated statistics of one scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub run_id: Uuid,
    pub name: String,
    pub mitigation: MitigationConfig,
    pub processed: TrafficCount,
    pub dropped: TrafficCount,
    pub dropped_by_stage: BTreeMap<FilterStage, u64>,
    /// Share of attack packets dropped
    pub attack_mitigation_rate: f64,
    /// Share of legitimate packets dropped
    pub legitimate_loss_rate: f64,
    pub peak_target_load: u64,
    pub target_capacity: u64,
    pub steps: Vec<StepReport>,
}

/// Results of a comparison between scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub seed: u64,
    pub network: NetworkConfig,
    pub traffic: TrafficConfig,
    pub scenarios: Vec<ScenarioSummary>,
}

/// Collects the step reports of one scenario run
pub struct Analytics {
    run_id: Uuid,
    scenario: String,
    mitigation: MitigationConfig,
    reports: Vec<StepReport>,
}

impl Analytics {
    pub fn new(scenario: &str, mitigation: MitigationConfig) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            scenario: scenario.to_string(),
            mitigation,
            reports: Vec::new(),
        }
    }

    /// Record a step report
    pub fn record(&mut self, report: StepReport) {
        let scenario = self.scenario.clone();
        counter!("ddos_sim_packets_processed_total", report.processed.legitimate,
            "scenario" => scenario.clone(), "class" => "legitimate");
        counter!("ddos_sim_packets_processed_total", report.processed.attack,
            "scenario" => scenario.clone(), "class" => "attack");
        counter!("ddos_sim_packets_dropped_total", report.dropped.legitimate,
            "scenario" => scenario.clone(), "class" => "legitimate");
        counter!("ddos_sim_packets_dropped_total", report.dropped.attack,
            "scenario" => scenario.clone(), "class" => "attack");
        gauge!("ddos_sim_target_load", report.target_load as f64, "scenario" => scenario);

        self.reports.push(report);
    }

    pub fn reports(&self) -> &[StepReport] {
        &self.reports
    }

    /// Aggregate the recorded steps
    pub fn summary(&self) -> ScenarioSummary {
        let mut processed = TrafficCount::default();
        let mut dropped = TrafficCount::default();
        let mut dropped_by_stage = BTreeMap::new();
        let mut peak_target_load = 0;
        let mut target_capacity = 0;

        for report in &self.reports {
            processed.add(&report.processed);
            dropped.add(&report.dropped);
            for (stage, count) in &report.dropped_by_stage {
                *dropped_by_stage.entry(*stage).or_insert(0) += count;
            }
            peak_target_load = peak_target_load.max(report.target_load);
            target_capacity = report.target_capacity;
        }

        ScenarioSummary {
            run_id: self.run_id,
            name: self.scenario.clone(),
            mitigation: self.mitigation,
            processed,
            dropped,
            dropped_by_stage,
            attack_mitigation_rate: ratio(dropped.attack, processed.attack + dropped.attack),
            legitimate_loss_rate: ratio(dropped.legitimate, processed.legitimate + dropped.legitimate),
            peak_target_load,
            target_capacity,
            steps: self.reports.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(step: u64, processed: TrafficCount, dropped: TrafficCount, load: u64) -> StepReport {
        let mut dropped_by_stage = BTreeMap::new();
        if dropped.total() > 0 {
            dropped_by_stage.insert(FilterStage::RateLimiting, dropped.total());
        }
        StepReport {
            step,
            batch_size: processed.total() + dropped.total(),
            processed,
            dropped,
            dropped_by_stage,
            target_id: 0,
            target_load: load,
            target_capacity: 1000,
        }
    }

    #[test]
    fn test_step_report_from_outcome() {
        let mut target = Node::new(0, 1000, false);
        for _ in 0..7 {
            target.accept_packet();
        }
        let outcome = StepOutcome {
            processed: TrafficCount { legitimate: 5, attack: 2 },
            dropped: TrafficCount { legitimate: 1, attack: 9 },
            dropped_by_stage: BTreeMap::from([(FilterStage::IpFiltering, 10)]),
        };

        let report = StepReport::new(4, outcome, &target);
        assert_eq!(report.step, 4);
        assert_eq!(report.batch_size, 17);
        assert_eq!(report.target_load, 7);
        assert_eq!(report.target_capacity, 1000);
    }

    #[test]
    fn test_summary_totals_and_rates() {
        let mut analytics = Analytics::new("With Rate Limiting", MitigationConfig {
            rate_limiting: true,
            ..MitigationConfig::default()
        });

        analytics.record(report(
            0,
            TrafficCount { legitimate: 100, attack: 900 },
            TrafficCount { legitimate: 0, attack: 9100 },
            1000,
        ));
        analytics.record(report(
            1,
            TrafficCount { legitimate: 90, attack: 910 },
            TrafficCount { legitimate: 10, attack: 9090 },
            1000,
        ));

        assert_eq!(analytics.reports().len(), 2);
        assert_eq!(analytics.reports()[1].step, 1);

        let summary = analytics.summary();
        assert_eq!(summary.name, "With Rate Limiting");
        assert_eq!(summary.processed, TrafficCount { legitimate: 190, attack: 1810 });
        assert_eq!(summary.dropped, TrafficCount { legitimate: 10, attack: 18190 });
        assert_eq!(summary.dropped_by_stage.get(&FilterStage::RateLimiting), Some(&18200));
        assert!((summary.attack_mitigation_rate - 18190.0 / 20000.0).abs() < 1e-9);
        assert!((summary.legitimate_loss_rate - 0.05).abs() < 1e-9);
        assert_eq!(summary.peak_target_load, 1000);
        assert_eq!(summary.steps.len(), 2);
    }

    #[test]
    fn test_empty_summary() {
        let summary = Analytics::new("Idle", MitigationConfig::default()).summary();
        assert_eq!(summary.processed.total(), 0);
        assert_eq!(summary.attack_mitigation_rate, 0.0);
        assert!(summary.steps.is_empty());
    }
}
