//! Connector configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Snapshots older than this are re-synced by the scheduler (5 minutes).
pub const DATA_REFRESH_MS: i64 = 5 * 60 * 1000;

/// Credentials older than this are refreshed by the scheduler (90 days).
pub const TOKEN_REFRESH_MS: i64 = 90 * 24 * 60 * 60 * 1000;

/// Scheduler period, in seconds.
pub const TICK_INTERVAL_SECS: u64 = 5 * 60;

/// Tunable windows for the reconciliation manager.
///
/// Defaults match the bot service's expectations; tests shrink them to
/// exercise the refresh paths with simulated time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Milliseconds after which the level snapshot is considered stale.
    pub data_refresh_ms: i64,
    /// Milliseconds after which the credential is refreshed.
    pub token_refresh_ms: i64,
    /// Seconds between scheduler ticks.
    pub tick_interval_secs: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            data_refresh_ms: DATA_REFRESH_MS,
            token_refresh_ms: TOKEN_REFRESH_MS,
            tick_interval_secs: TICK_INTERVAL_SECS,
        }
    }
}

impl LinkConfig {
    /// Scheduler period as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }
}
