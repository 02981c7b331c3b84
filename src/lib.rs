//! DDoS mitigation simulator
//!
//! Simulates a network under a DDoS attack step by step and compares
//! mitigation strategies (rate limiting, IP filtering, deep packet
//! inspection, traffic pattern analysis) applied alone or combined.

pub mod config;
pub mod core;
pub mod models;
pub mod report;
pub mod utils;
