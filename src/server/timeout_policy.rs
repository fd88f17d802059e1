use std::time::Duration;

use super::config::ServerConfig;

/// Read deadline that shrinks as the server gets busier: every open
/// connection subtracts a fixed penalty from the base timeout, down to
/// a configured floor.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutPolicy {
    base_ms: u64,
    penalty_ms: u64,
    floor_ms: u64,
}

impl TimeoutPolicy {
    pub fn new(base_ms: u64, penalty_ms: u64, floor_ms: u64) -> Self {
        // set_read_timeout rejects a zero Duration, so the floor never is.
        Self {
            base_ms,
            penalty_ms,
            floor_ms: floor_ms.max(1),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.base_timeout_ms,
            config.timeout_penalty_ms,
            config.min_timeout_ms,
        )
    }

    pub fn read_timeout(&self, open_connections: usize) -> Duration {
        let penalty = self
            .penalty_ms
            .saturating_mul(open_connections as u64);
        Duration::from_millis(self.base_ms.saturating_sub(penalty).max(self.floor_ms))
    }
}
