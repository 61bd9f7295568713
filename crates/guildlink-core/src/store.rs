//! Session persistence contract.

use async_trait::async_trait;

use crate::error::Result;
use crate::session::SessionRecord;

/// An abstract store for the single persisted session record.
///
/// Decouples the reconciliation manager from the storage mechanism. The
/// manager writes strictly after the corresponding successful remote
/// exchange (write-after-confirm), so implementations never see a record
/// the remote has not acknowledged.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the persisted record.
    ///
    /// Returns `Ok(None)` when nothing has been persisted. An unparsable
    /// record is a `CorruptSession` error; the caller owns the recovery.
    async fn load(&self) -> Result<Option<SessionRecord>>;

    /// Persists the record, replacing any previous one.
    async fn save(&self, record: &SessionRecord) -> Result<()>;

    /// Removes the persisted record. Removing an absent record is not an
    /// error.
    async fn clear(&self) -> Result<()>;
}
