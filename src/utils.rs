use crate::models::NodeId;

/// Signature carried by every legitimate packet
pub const LEGITIMATE_SIGNATURE: &str = "legitimate";

/// Signature shared by all packets of one attacker, across steps
pub fn attack_signature(attacker_id: NodeId) -> String {
    format!("attack_{}", attacker_id)
}

/// `part / whole`, or 0 when there is nothing to divide
pub fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
