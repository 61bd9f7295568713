//! The persisted session record.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::levels::SyncPayload;

/// The single persisted unit for a connected session.
///
/// Created on successful connect, rewritten after every successful exchange
/// or credential refresh, and removed on logout or irrecoverable refresh
/// failure. A record exists in storage if and only if the manager considers
/// itself connected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub identity: Identity,
    pub sync: SyncPayload,
    /// Epoch millis of the last successful exchange.
    pub last_sync_at: i64,
    /// Epoch millis of the last successful credential refresh.
    pub last_token_refresh_at: i64,
}
