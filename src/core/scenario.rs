//! Scenario runner for the DDoS mitigation simulator.
//!
//! A runner owns everything one scenario needs: the node registry, the
//! seeded generator and the pipeline with its tracking state. Nothing is
//! shared between runs; comparing configurations means building one runner
//! per configuration from the same seed.

use chrono::Utc;
use log::{debug, info, warn};
use thiserror::Error;
use uuid::Uuid;
use crate::core::analytics::{Analytics, ComparisonReport, ScenarioSummary, StepReport};
use crate::core::mitigation::MitigationPipeline;
use crate::core::node_registry::{NetworkError, NodeRegistry};
use crate::core::traffic_generator::{TrafficError, TrafficGenerator};
use crate::models::{ScenarioConfig, SimulationConfig, TrafficConfig};
use crate::report::StepReporter;

/// Errors that can occur while running a scenario
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),
    #[error("traffic error: {0}")]
    Traffic(#[from] TrafficError),
    #[error("report error: {0}")]
    Report(#[from] std::io::Error),
}

/// Runs the steps of one scenario
pub struct ScenarioRunner {
    scenario: ScenarioConfig,
    traffic: TrafficConfig,
    registry: NodeRegistry,
    generator: TrafficGenerator,
    pipeline: MitigationPipeline,
    analytics: Analytics,
    step: u64,
}

impl ScenarioRunner {
    /// Build a runner with a fresh registry, tracking state and RNG
    pub fn new(config: &SimulationConfig, scenario: &ScenarioConfig, seed: u64) -> Result<Self, ScenarioError> {
        let registry = NodeRegistry::new(&config.network)?;

        Ok(Self {
            scenario: scenario.clone(),
            traffic: config.traffic.clone(),
            registry,
            generator: TrafficGenerator::new(seed),
            pipeline: MitigationPipeline::new(&scenario.mitigation, config.thresholds.clone()),
            analytics: Analytics::new(&scenario.name, scenario.mitigation),
            step: 0,
        })
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn pipeline(&self) -> &MitigationPipeline {
        &self.pipeline
    }

    pub fn current_step(&self) -> u64 {
        self.step
    }

    /// Run one step: reset loads, generate, filter, then advance the step counter
    pub fn step(&mut self) -> Result<StepReport, ScenarioError> {
        self.registry.reset_loads();

        let target = self.registry.target().id;
        let batch = self.generator.generate(
            &self.registry,
            target,
            self.traffic.attack_intensity,
            self.traffic.legitimate_traffic,
            self.step,
        )?;
        let outcome = self.pipeline.process(batch, &mut self.registry, self.step);
        let report = StepReport::new(self.step, outcome, self.registry.target());

        debug!(
            "{} step {}: processed {}, dropped {}, target load {}/{}",
            self.scenario.name,
            report.step,
            report.processed.total(),
            report.dropped.total(),
            report.target_load,
            report.target_capacity
        );

        self.analytics.record(report.clone());
        self.step += 1;
        Ok(report)
    }

    /// Run `steps` steps, emitting each report, and summarize the run
    pub fn run(mut self, steps: u64, reporter: &mut dyn StepReporter) -> Result<ScenarioSummary, ScenarioError> {
        info!("Running scenario '{}' for {} steps", self.scenario.name, steps);
        reporter.scenario_started(&self.scenario.name, &self.scenario.mitigation)?;

        for _ in 0..steps {
            let report = self.step()?;
            reporter.step_completed(&self.scenario.name, &report)?;
        }

        let summary = self.analytics.summary();
        if summary.dropped.legitimate > 0 {
            warn!(
                "Scenario '{}' dropped {} legitimate packets",
                summary.name, summary.dropped.legitimate
            );
        }
        info!(
            "Scenario '{}' finished: {:.1}% of attack traffic mitigated",
            summary.name,
            summary.attack_mitigation_rate * 100.0
        );
        reporter.scenario_finished(&summary)?;
        Ok(summary)
    }
}

/// Run a single scenario from a fresh state
pub fn run_scenario(
    config: &SimulationConfig,
    scenario: &ScenarioConfig,
    seed: u64,
    reporter: &mut dyn StepReporter,
) -> Result<ScenarioSummary, ScenarioError> {
    ScenarioRunner::new(config, scenario, seed)?.run(config.run.steps, reporter)
}

/// Run every configured scenario with the same seed
pub fn run_comparison(
    config: &SimulationConfig,
    seed: u64,
    reporter: &mut dyn StepReporter,
) -> Result<ComparisonReport, ScenarioError> {
    info!(
        "Comparing {} scenarios over {} steps (seed {})",
        config.scenarios.len(),
        config.run.steps,
        seed
    );

    let scenarios = config
        .scenarios
        .iter()
        .map(|scenario| run_scenario(config, scenario, seed, reporter))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ComparisonReport {
        id: Uuid::new_v4(),
        generated_at: Utc::now(),
        seed,
        network: config.network.clone(),
        traffic: config.traffic.clone(),
        scenarios,
    })
}
