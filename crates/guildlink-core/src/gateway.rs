//! Remote service gateway contract.

use async_trait::async_trait;

use crate::error::Result;
use crate::identity::Identity;
use crate::levels::{ModuleLevels, SyncMode, SyncPayload};
use crate::roster::CorpData;

/// The remote operations exposed by the bot service.
///
/// Each call performs one network round-trip and classifies the outcome:
/// statuses in `[200, 400)` succeed, `[400, 500)` surface the server's
/// message as `RemoteRejected`, and `>= 500` or transport failures surface
/// as `ServiceUnavailable`.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Submits a one-time connect code and returns the identity it maps to.
    ///
    /// The returned credential is short-lived and only valid for the
    /// subsequent [`connect`](Self::connect) call; the identity should be
    /// confirmed with the user before connecting.
    async fn check_identity(&self, code: &str) -> Result<Identity>;

    /// Exchanges the short-lived credential plus guild selection for a
    /// long-lived credential (nominal validity 365 days).
    async fn connect(&self, identity: &Identity) -> Result<Identity>;

    /// Extends credential validity without changing identity.
    ///
    /// Must be called before the validity window elapses; the returned
    /// identity replaces the stored one wholesale.
    async fn refresh_connection(&self, token: &str) -> Result<Identity>;

    /// Exchanges module levels with the bot under the given [`SyncMode`].
    ///
    /// In `Get` mode the sent snapshot is forced empty.
    async fn sync(
        &self,
        token: &str,
        mode: SyncMode,
        levels: &ModuleLevels,
    ) -> Result<SyncPayload>;

    /// Read-only roster query, optionally filtered by a role id.
    async fn corp_data(&self, token: &str, role_id: Option<&str>) -> Result<CorpData>;
}
