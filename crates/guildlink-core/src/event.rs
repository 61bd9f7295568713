//! Lifecycle notifications emitted by the reconciliation manager.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::levels::ModuleLevels;

/// Notifications delivered to subscribers in the order operations complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LinkEvent {
    /// A session was established or restored.
    Connected { identity: Identity },
    /// Establishing or keeping the session alive failed.
    ConnectFailed { message: String },
    /// The session was closed by an explicit logout.
    Disconnected,
    /// A successful exchange replaced the level snapshot.
    Sync { levels: ModuleLevels },
}
