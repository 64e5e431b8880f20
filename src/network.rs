//! Simulated network for preview actions
//!
//! Nothing goes over the wire. "Network" actions wait a fixed latency and
//! then fail with a fixed probability, so the previews show loading states
//! and connection errors like a real app would.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::network;

pub struct NetworkSimulator {
    latency: Duration,
    failure_rate: f64,
    rng: StdRng,
}

impl NetworkSimulator {
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(network::LATENCY_MS),
            failure_rate: network::FAILURE_RATE,
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixed failure probability, clamped to 0.0..=1.0
    #[cfg(test)]
    pub fn with_failure_rate(failure_rate: f64) -> Self {
        Self {
            failure_rate: failure_rate.clamp(0.0, 1.0),
            ..Self::new()
        }
    }

    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new()
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    #[cfg(test)]
    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    /// Decide whether the request that just "completed" failed
    pub fn roll_failure(&mut self) -> bool {
        self.rng.gen_bool(self.failure_rate)
    }
}

impl Default for NetworkSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extreme_rates_are_deterministic() {
        let mut never = NetworkSimulator::with_failure_rate(0.0);
        let mut always = NetworkSimulator::with_failure_rate(1.0);
        for _ in 0..100 {
            assert!(!never.roll_failure());
            assert!(always.roll_failure());
        }
    }

    #[test]
    fn test_rate_is_clamped() {
        assert_eq!(NetworkSimulator::with_failure_rate(4.0).failure_rate(), 1.0);
        assert_eq!(NetworkSimulator::with_failure_rate(-1.0).failure_rate(), 0.0);
    }

    #[test]
    fn test_default_rate_is_roughly_ten_percent() {
        let mut sim = NetworkSimulator::seeded(42);
        let failures = (0..10_000).filter(|_| sim.roll_failure()).count();
        assert!((800..1200).contains(&failures), "failures={failures}");
    }
}
