//! Module levels and the synchronization envelope.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Numeric id of one progression module, defined by the module catalog.
pub type ModuleId = u32;

/// Protocol version carried by every sync exchange.
pub const SYNC_VERSION: u32 = 1;

/// A single module level with the timestamp of its most recent write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleLevel {
    pub level: u32,
    /// Epoch milliseconds of the last local or remote write.
    pub ts: i64,
}

/// The complete set of module levels known to a session, keyed by module id.
pub type ModuleLevels = HashMap<ModuleId, ModuleLevel>;

/// Synchronization mode for a level exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Replace local state with whatever the remote returns.
    Get,
    /// Overwrite the remote's stored values wholesale.
    Set,
    /// Reconcile field-by-field, keeping the record with the greater timestamp.
    Sync,
}

impl SyncMode {
    /// Path segment used by the sync endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::Get => "get",
            SyncMode::Set => "set",
            SyncMode::Sync => "sync",
        }
    }
}

/// Envelope returned by every reconciliation call.
///
/// Replaces the locally cached snapshot in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPayload {
    pub ver: u32,
    pub in_sync: u32,
    #[serde(default)]
    pub tech_levels: ModuleLevels,
}

impl SyncPayload {
    /// An empty envelope at the current protocol version.
    pub fn empty() -> Self {
        Self {
            ver: SYNC_VERSION,
            in_sync: 1,
            tech_levels: ModuleLevels::new(),
        }
    }
}

/// Merges two level snapshots field-by-field, keeping for each module the
/// record with the greater timestamp. Ties keep the local record.
pub fn merge_levels(local: &ModuleLevels, remote: &ModuleLevels) -> ModuleLevels {
    let mut merged = remote.clone();
    for (id, entry) in local {
        let remote_is_newer = merged.get(id).is_some_and(|r| r.ts > entry.ts);
        if !remote_is_newer {
            merged.insert(*id, entry.clone());
        }
    }
    merged
}
