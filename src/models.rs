use serde::{Deserialize, Serialize};

/// Node identifier, assigned sequentially from 0
pub type NodeId = usize;

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Total number of nodes
    pub node_count: usize,
    /// Number of attacker nodes (the lowest ids)
    pub attacker_count: usize,
    /// Node receiving all generated traffic
    pub target_node_id: NodeId,
    /// Capacity of every node except the target (packets per step)
    pub baseline_capacity: u64,
    /// Capacity of the target node (packets per step)
    pub target_capacity: u64,
}

/// Traffic volume configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficConfig {
    /// Multiplier of attacker capacity giving its packets per step
    pub attack_intensity: f64,
    /// Legitimate packets generated per step
    pub legitimate_traffic: u64,
}

/// Mitigation thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Cumulative attack packets per source before IP filtering drops
    pub ip_filter_threshold: u64,
    /// Cumulative packets per signature before deep packet inspection drops
    pub signature_threshold: u64,
    /// Substring marking a signature as an attack signature
    pub attack_marker: String,
    /// Cumulative source count above which pattern analysis drops
    pub pattern_source_threshold: u64,
    /// Packet age (in steps) under which pattern analysis applies
    pub pattern_window_steps: u64,
}

/// Run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of simulation steps per scenario
    pub steps: u64,
    /// RNG seed; drawn at startup when absent
    pub seed: Option<u64>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Whether to print every step to the console
    pub print_steps: bool,
    /// Where to write the JSON comparison report
    pub json_path: Option<String>,
}

/// Mitigation toggles, fixed for a scenario run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MitigationConfig {
    pub rate_limiting: bool,
    pub ip_filtering: bool,
    pub deep_packet_inspection: bool,
    pub traffic_pattern_analysis: bool,
}

impl MitigationConfig {
    /// Every mitigation technique enabled
    pub fn all() -> Self {
        Self {
            rate_limiting: true,
            ip_filtering: true,
            deep_packet_inspection: true,
            traffic_pattern_analysis: true,
        }
    }
}

/// A named mitigation configuration to simulate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    #[serde(default)]
    pub mitigation: MitigationConfig,
}

impl ScenarioConfig {
    pub fn new(name: &str, mitigation: MitigationConfig) -> Self {
        Self {
            name: name.to_string(),
            mitigation,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Network configuration
    pub network: NetworkConfig,
    /// Traffic configuration
    pub traffic: TrafficConfig,
    /// Mitigation thresholds
    pub thresholds: ThresholdConfig,
    /// Run configuration
    pub run: RunConfig,
    /// Output configuration
    pub output: OutputConfig,
    /// Scenarios to compare
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<ScenarioConfig>,
}

/// The comparison suite: no mitigation, each technique alone, then all of them
pub fn default_scenarios() -> Vec<ScenarioConfig> {
    let none = MitigationConfig::default();
    vec![
        ScenarioConfig::new("Without Mitigation", none),
        ScenarioConfig::new(
            "With Rate Limiting",
            MitigationConfig { rate_limiting: true, ..none },
        ),
        ScenarioConfig::new(
            "With IP Filtering",
            MitigationConfig { ip_filtering: true, ..none },
        ),
        ScenarioConfig::new(
            "With Deep Packet Inspection",
            MitigationConfig { deep_packet_inspection: true, ..none },
        ),
        ScenarioConfig::new(
            "With Traffic Pattern Analysis",
            MitigationConfig { traffic_pattern_analysis: true, ..none },
        ),
        ScenarioConfig::new("With All Mitigation Techniques", MitigationConfig::all()),
    ]
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            node_count: 50,
            attacker_count: 10,
            target_node_id: 0,
            baseline_capacity: 500,
            target_capacity: 1000,
        }
    }
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            attack_intensity: 2.0,
            legitimate_traffic: 100,
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            ip_filter_threshold: 100,
            signature_threshold: 50,
            attack_marker: "attack".to_string(),
            pattern_source_threshold: 200,
            pattern_window_steps: 5,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            traffic: TrafficConfig::default(),
            thresholds: ThresholdConfig::default(),
            run: RunConfig {
                steps: 10,
                seed: None,
            },
            output: OutputConfig {
                print_steps: true,
                json_path: None,
            },
            scenarios: default_scenarios(),
        }
    }
}

/// A simulated packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub source_id: NodeId,
    pub destination_id: NodeId,
    /// Ground truth, only used for statistics
    pub is_legitimate: bool,
    /// Step the packet was generated in
    pub timestamp: u64,
    pub signature: String,
}

/// Packet counts split by traffic class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficCount {
    pub legitimate: u64,
    pub attack: u64,
}

impl TrafficCount {
    pub fn total(&self) -> u64 {
        self.legitimate + self.attack
    }

    /// Count one packet of the given class
    pub fn record(&mut self, is_legitimate: bool) {
        if is_legitimate {
            self.legitimate += 1;
        } else {
            self.attack += 1;
        }
    }

    pub fn add(&mut self, other: &TrafficCount) {
        self.legitimate += other.legitimate;
        self.attack += other.attack;
    }
}
