//! Node registry for the simulated network.
//!
//! Holds every node's capacity, per-step load and attacker role. Load is
//! reset at the start of each step and only grows while packets are
//! accepted; capacity is only consulted by the rate limiting stage.

use thiserror::Error;
use crate::models::{NetworkConfig, NodeId};

/// Errors that can occur while building the network
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NetworkError {
    #[error("no non-attacker node to source legitimate traffic ({node_count} nodes, {attacker_count} attackers)")]
    NoLegitimateSource {
        node_count: usize,
        attacker_count: usize,
    },
    #[error("target node {target} does not exist ({node_count} nodes)")]
    UnknownTarget { target: NodeId, node_count: usize },
}

/// A node of the simulated network
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    /// Maximum packets per step this node can process
    pub capacity: u64,
    /// Packets accepted during the current step
    pub current_load: u64,
    pub is_attacker: bool,
}

impl Node {
    pub fn new(id: NodeId, capacity: u64, is_attacker: bool) -> Self {
        Self {
            id,
            capacity,
            current_load: 0,
            is_attacker,
        }
    }

    pub fn can_handle_packet(&self) -> bool {
        self.current_load < self.capacity
    }

    /// Count one accepted packet. Capacity is not enforced here.
    pub fn accept_packet(&mut self) {
        self.current_load += 1;
    }

    pub fn reset_load(&mut self) {
        self.current_load = 0;
    }
}

/// All nodes of one scenario run, indexed by id
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    nodes: Vec<Node>,
    target_id: NodeId,
}

impl NodeRegistry {
    /// Build `node_count` nodes; the first `attacker_count` ids are attackers
    /// and the target node gets the elevated capacity.
    pub fn new(config: &NetworkConfig) -> Result<Self, NetworkError> {
        if config.attacker_count >= config.node_count {
            return Err(NetworkError::NoLegitimateSource {
                node_count: config.node_count,
                attacker_count: config.attacker_count,
            });
        }
        if config.target_node_id >= config.node_count {
            return Err(NetworkError::UnknownTarget {
                target: config.target_node_id,
                node_count: config.node_count,
            });
        }

        let nodes = (0..config.node_count)
            .map(|id| {
                let capacity = if id == config.target_node_id {
                    config.target_capacity
                } else {
                    config.baseline_capacity
                };
                Node::new(id, capacity, id < config.attacker_count)
            })
            .collect();

        Ok(Self {
            nodes,
            target_id: config.target_node_id,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn target(&self) -> &Node {
        &self.nodes[self.target_id]
    }

    pub fn attackers(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_attacker)
    }

    pub fn has_legitimate_source(&self) -> bool {
        self.nodes.iter().any(|node| !node.is_attacker)
    }

    pub fn is_attacker(&self, id: NodeId) -> bool {
        self.nodes[id].is_attacker
    }

    pub fn can_handle_packet(&self, id: NodeId) -> bool {
        self.nodes[id].can_handle_packet()
    }

    pub fn accept_packet(&mut self, id: NodeId) {
        self.nodes[id].accept_packet();
    }

    pub fn reset_load(&mut self, id: NodeId) {
        self.nodes[id].reset_load();
    }

    /// Reset every node's load at the start of a step
    pub fn reset_loads(&mut self) {
        for node in &mut self.nodes {
            node.reset_load();
        }
    }
}
