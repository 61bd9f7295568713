//! Session and reconciliation management for the GuildLink connector.

mod config;
mod manager;

pub use config::{DATA_REFRESH_MS, LinkConfig, TICK_INTERVAL_SECS, TOKEN_REFRESH_MS};
pub use manager::{GuildLink, LinkState};
