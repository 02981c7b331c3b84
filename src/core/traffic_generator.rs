//! Traffic generation for the DDoS mitigation simulator.
//!
//! Each step produces one batch: legitimate packets from randomly chosen
//! non-attacker sources first, then every attacker's packets in id order.
//! That order is part of the simulation's semantics since later stages
//! count and rate limit in processing order.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use crate::core::node_registry::NodeRegistry;
use crate::models::{NodeId, Packet};
use crate::utils::{attack_signature, LEGITIMATE_SIGNATURE};

/// Errors that can occur while generating traffic
#[derive(Error, Debug, PartialEq)]
pub enum TrafficError {
    #[error("attack intensity must be finite and non-negative, got {0}")]
    InvalidIntensity(f64),
    #[error("no non-attacker node available as legitimate traffic source")]
    NoLegitimateSource,
}

/// Seeded packet generator
pub struct TrafficGenerator {
    rng: StdRng,
}

impl TrafficGenerator {
    /// Create a generator whose source choices are reproducible from `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate the packet batch for `step`
    ///
    /// # Arguments
    ///
    /// * `registry` - The network nodes
    /// * `target` - Destination of every generated packet
    /// * `attack_intensity` - Multiplier of each attacker's capacity
    /// * `legitimate_traffic` - Number of legitimate packets
    /// * `step` - Timestamp carried by every packet
    pub fn generate(
        &mut self,
        registry: &NodeRegistry,
        target: NodeId,
        attack_intensity: f64,
        legitimate_traffic: u64,
        step: u64,
    ) -> Result<Vec<Packet>, TrafficError> {
        if !attack_intensity.is_finite() || attack_intensity < 0.0 {
            return Err(TrafficError::InvalidIntensity(attack_intensity));
        }
        if legitimate_traffic > 0 && !registry.has_legitimate_source() {
            return Err(TrafficError::NoLegitimateSource);
        }

        let mut batch = Vec::new();

        for _ in 0..legitimate_traffic {
            let source_id = self.pick_legitimate_source(registry);
            batch.push(Packet {
                source_id,
                destination_id: target,
                is_legitimate: true,
                timestamp: step,
                signature: LEGITIMATE_SIGNATURE.to_string(),
            });
        }

        for attacker in registry.attackers() {
            let volume = attack_volume(attack_intensity, attacker.capacity);
            let signature = attack_signature(attacker.id);
            batch.extend((0..volume).map(|_| Packet {
                source_id: attacker.id,
                destination_id: target,
                is_legitimate: false,
                timestamp: step,
                signature: signature.clone(),
            }));
        }

        debug!(
            "step {}: generated {} packets ({} legitimate)",
            step,
            batch.len(),
            legitimate_traffic
        );
        Ok(batch)
    }

    /// Draw uniformly over all nodes, redrawing until the node is not an attacker
    fn pick_legitimate_source(&mut self, registry: &NodeRegistry) -> NodeId {
        loop {
            let candidate = self.rng.gen_range(0..registry.len());
            if !registry.is_attacker(candidate) {
                return candidate;
            }
        }
    }
}

/// Packets one attacker sends per step: `floor(intensity * capacity)`
pub fn attack_volume(attack_intensity: f64, capacity: u64) -> u64 {
    (attack_intensity * capacity as f64).floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NetworkConfig;

    fn registry(node_count: usize, attacker_count: usize) -> NodeRegistry {
        NodeRegistry::new(&NetworkConfig {
            node_count,
            attacker_count,
            ..NetworkConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_batch_composition_and_order() {
        let registry = registry(50, 10);
        let mut generator = TrafficGenerator::new(1);

        let batch = generator.generate(&registry, 0, 2.0, 100, 3).unwrap();

        // attacker 0 is also the target and sends at the elevated capacity
        assert_eq!(batch.len(), 100 + 2000 + 9 * 1000);
        assert!(batch[..100].iter().all(|p| p.is_legitimate));
        assert!(batch[100..].iter().all(|p| !p.is_legitimate));
        assert!(batch.iter().all(|p| p.timestamp == 3 && p.destination_id == 0));

        // attack packets are grouped by attacker id
        let attack_sources: Vec<NodeId> = batch[100..].iter().map(|p| p.source_id).collect();
        let mut sorted = attack_sources.clone();
        sorted.sort();
        assert_eq!(attack_sources, sorted);
    }

    #[test]
    fn test_legitimate_sources_are_never_attackers() {
        let registry = registry(12, 10);
        let mut generator = TrafficGenerator::new(99);

        for step in 0..20 {
            let batch = generator.generate(&registry, 11, 0.0, 50, step).unwrap();
            assert_eq!(batch.len(), 50);
            for packet in batch {
                assert!(packet.is_legitimate);
                assert!(!registry.is_attacker(packet.source_id));
                assert_eq!(packet.signature, LEGITIMATE_SIGNATURE);
            }
        }
    }

    #[test]
    fn test_attack_volume_uses_attacker_capacity() {
        // attacker 0 is the target here and carries the elevated capacity
        let registry = registry(4, 2);
        let mut generator = TrafficGenerator::new(5);

        let batch = generator.generate(&registry, 3, 0.5, 0, 0).unwrap();

        let from_zero = batch.iter().filter(|p| p.source_id == 0).count();
        let from_one = batch.iter().filter(|p| p.source_id == 1).count();
        assert_eq!(from_zero, 500);
        assert_eq!(from_one, 250);
        assert!(batch.iter().filter(|p| p.source_id == 1).all(|p| p.signature == "attack_1"));
    }

    #[test]
    fn test_attack_volume_floors() {
        assert_eq!(attack_volume(2.0, 500), 1000);
        assert_eq!(attack_volume(0.333, 10), 3);
        assert_eq!(attack_volume(0.0, 1000), 0);
    }

    #[test]
    fn test_same_seed_same_sources() {
        let registry = registry(50, 10);
        let mut first = TrafficGenerator::new(42);
        let mut second = TrafficGenerator::new(42);

        let a = first.generate(&registry, 0, 1.0, 100, 0).unwrap();
        let b = second.generate(&registry, 0, 1.0, 100, 0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_intensity() {
        let registry = registry(5, 1);
        let mut generator = TrafficGenerator::new(0);

        assert_eq!(
            generator.generate(&registry, 0, -0.5, 10, 0),
            Err(TrafficError::InvalidIntensity(-0.5))
        );
    }
}
