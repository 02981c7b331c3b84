//! Mitigation pipeline for the DDoS mitigation simulator.
//!
//! A pipeline is an ordered list of filter stages built once from a
//! [`MitigationConfig`]. Every packet of a batch runs through the stages in
//! order until one drops it; later stages never see a dropped packet, so
//! they do not update their counters for it. Surviving packets are accepted
//! by their destination node, which feeds the rate limiting check of the
//! packets that follow in the same step.
//!
//! Counters live in [`TrackingState`], owned by the pipeline for the whole
//! scenario run and never reset between steps.

use std::collections::{BTreeMap, HashMap};
use log::trace;
use serde::{Deserialize, Serialize};
use crate::core::node_registry::NodeRegistry;
use crate::models::{MitigationConfig, NodeId, Packet, ThresholdConfig, TrafficCount};

/// Cumulative counters shared by the filter stages
#[derive(Debug, Default, Clone)]
pub struct TrackingState {
    /// Attack packets counted by IP filtering, per source
    source_packet_count: HashMap<NodeId, u64>,
    /// Packets counted by deep packet inspection, per signature
    signature_count: HashMap<String, u64>,
}

impl TrackingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_count(&self, source: NodeId) -> u64 {
        self.source_packet_count.get(&source).copied().unwrap_or(0)
    }

    pub fn signature_count(&self, signature: &str) -> u64 {
        self.signature_count.get(signature).copied().unwrap_or(0)
    }

    fn increment_source(&mut self, source: NodeId) -> u64 {
        let count = self.source_packet_count.entry(source).or_insert(0);
        *count += 1;
        *count
    }

    fn increment_signature(&mut self, signature: &str) -> u64 {
        if let Some(count) = self.signature_count.get_mut(signature) {
            *count += 1;
            return *count;
        }
        self.signature_count.insert(signature.to_string(), 1);
        1
    }
}

/// Decision of a single filter stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Drop,
}

/// Filter stages, declared in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilterStage {
    IpFiltering,
    DeepPacketInspection,
    RateLimiting,
    TrafficPatternAnalysis,
}

impl FilterStage {
    /// Stages enabled by `config`, in evaluation order
    pub fn enabled(config: &MitigationConfig) -> Vec<FilterStage> {
        let mut stages = Vec::with_capacity(4);
        if config.ip_filtering {
            stages.push(FilterStage::IpFiltering);
        }
        if config.deep_packet_inspection {
            stages.push(FilterStage::DeepPacketInspection);
        }
        if config.rate_limiting {
            stages.push(FilterStage::RateLimiting);
        }
        if config.traffic_pattern_analysis {
            stages.push(FilterStage::TrafficPatternAnalysis);
        }
        stages
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterStage::IpFiltering => "IP filtering",
            FilterStage::DeepPacketInspection => "deep packet inspection",
            FilterStage::RateLimiting => "rate limiting",
            FilterStage::TrafficPatternAnalysis => "traffic pattern analysis",
        }
    }

    /// Evaluate one packet, updating the stage's counters
    ///
    /// # Arguments
    ///
    /// * `packet` - The packet being filtered
    /// * `state` - Cumulative counters of the run
    /// * `registry` - Node loads as of the packets accepted so far this step
    /// * `step` - The step being processed
    /// * `thresholds` - Drop thresholds
    pub fn evaluate(
        &self,
        packet: &Packet,
        state: &mut TrackingState,
        registry: &NodeRegistry,
        step: u64,
        thresholds: &ThresholdConfig,
    ) -> Verdict {
        let drop = match self {
            FilterStage::IpFiltering => {
                // legitimate packets are neither counted nor dropped
                !packet.is_legitimate
                    && state.increment_source(packet.source_id) > thresholds.ip_filter_threshold
            }
            FilterStage::DeepPacketInspection => {
                let count = state.increment_signature(&packet.signature);
                packet.signature.contains(thresholds.attack_marker.as_str())
                    && count > thresholds.signature_threshold
            }
            FilterStage::RateLimiting => !registry.can_handle_packet(packet.destination_id),
            FilterStage::TrafficPatternAnalysis => {
                step.saturating_sub(packet.timestamp) < thresholds.pattern_window_steps
                    && state.source_count(packet.source_id) > thresholds.pattern_source_threshold
            }
        };

        if drop {
            Verdict::Drop
        } else {
            Verdict::Keep
        }
    }
}

/// Outcome of filtering one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub processed: TrafficCount,
    pub dropped: TrafficCount,
    /// Drops attributed to the stage that made them
    pub dropped_by_stage: BTreeMap<FilterStage, u64>,
}

impl StepOutcome {
    pub fn batch_size(&self) -> u64 {
        self.processed.total() + self.dropped.total()
    }
}

/// Ordered filter chain plus the tracking state of one scenario run
pub struct MitigationPipeline {
    stages: Vec<FilterStage>,
    thresholds: ThresholdConfig,
    state: TrackingState,
}

impl MitigationPipeline {
    /// Create a pipeline with fresh tracking state
    pub fn new(config: &MitigationConfig, thresholds: ThresholdConfig) -> Self {
        Self {
            stages: FilterStage::enabled(config),
            thresholds,
            state: TrackingState::new(),
        }
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    pub fn state(&self) -> &TrackingState {
        &self.state
    }

    /// Filter one step's batch in order, accepting survivors on their destination node
    pub fn process(
        &mut self,
        batch: Vec<Packet>,
        registry: &mut NodeRegistry,
        step: u64,
    ) -> StepOutcome {
        let mut outcome = StepOutcome::default();

        for packet in batch {
            match self.first_drop(&packet, registry, step) {
                Some(stage) => {
                    trace!(
                        "step {}: {} dropped packet from node {}",
                        step,
                        stage.name(),
                        packet.source_id
                    );
                    outcome.dropped.record(packet.is_legitimate);
                    *outcome.dropped_by_stage.entry(stage).or_insert(0) += 1;
                }
                None => {
                    registry.accept_packet(packet.destination_id);
                    outcome.processed.record(packet.is_legitimate);
                }
            }
        }

        outcome
    }

    /// The first stage that drops `packet`, if any
    fn first_drop(&mut self, packet: &Packet, registry: &NodeRegistry, step: u64) -> Option<FilterStage> {
        let Self { stages, thresholds, state } = self;
        stages
            .iter()
            .copied()
            .find(|stage| stage.evaluate(packet, state, registry, step, thresholds) == Verdict::Drop)
    }
}
