//! Core functionality for the DDoS mitigation simulator.
//!
//! This module contains the simulation components: the node registry,
//! traffic generation, the mitigation pipeline, statistics and the
//! scenario runner.

pub mod node_registry;
pub mod traffic_generator;
pub mod mitigation;
pub mod analytics;
pub mod scenario;

pub use node_registry::{NetworkError, Node, NodeRegistry};
pub use traffic_generator::{TrafficError, TrafficGenerator};
pub use mitigation::{FilterStage, MitigationPipeline, StepOutcome, TrackingState, Verdict};
pub use analytics::{Analytics, ComparisonReport, ScenarioSummary, StepReport};
pub use scenario::{run_comparison, run_scenario, ScenarioError, ScenarioRunner};
