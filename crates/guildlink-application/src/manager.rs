//! Session and reconciliation management.
//!
//! [`GuildLink`] owns the connection lifecycle (connect, refresh,
//! disconnect), the periodic background scheduler, and the three-mode
//! synchronization of module levels against the bot service.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use guildlink_core::{
    BotApi, Clock, CorpData, Guild, Identity, LinkError, LinkEvent, ModuleCatalog, ModuleId,
    ModuleLevel, ModuleLevels, Result, SessionRecord, SessionStore, SyncMode, SyncPayload, User,
};

use crate::config::LinkConfig;

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
    Refreshing,
}

/// In-memory session owned by the manager.
#[derive(Debug)]
struct LinkSession {
    state: LinkState,
    identity: Option<Identity>,
    sync: Option<SyncPayload>,
    last_sync_at: i64,
    last_token_refresh_at: i64,
}

impl LinkSession {
    fn new() -> Self {
        Self {
            state: LinkState::Disconnected,
            identity: None,
            sync: None,
            last_sync_at: 0,
            last_token_refresh_at: 0,
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn record(&self) -> Option<SessionRecord> {
        let identity = self.identity.clone()?;
        let sync = self.sync.clone()?;
        Some(SessionRecord {
            identity,
            sync,
            last_sync_at: self.last_sync_at,
            last_token_refresh_at: self.last_token_refresh_at,
        })
    }
}

/// The reconciliation manager.
///
/// Manages a single logical session. All lifecycle and exchange operations
/// serialize behind one lock over the inner session, so at most one
/// exchange is in flight at a time; a caller staging a level while a
/// scheduler-triggered sync is running waits behind it.
///
/// Storage writes happen strictly after the corresponding successful remote
/// exchange, never before.
pub struct GuildLink {
    api: Arc<dyn BotApi>,
    store: Arc<dyn SessionStore>,
    catalog: Arc<ModuleCatalog>,
    clock: Arc<dyn Clock>,
    config: LinkConfig,
    session: Mutex<LinkSession>,
    subscribers: std::sync::Mutex<Vec<mpsc::UnboundedSender<LinkEvent>>>,
    cancel: CancellationToken,
    scheduler_started: AtomicBool,
}

impl GuildLink {
    /// Creates a manager over the given collaborators.
    pub fn new(
        api: Arc<dyn BotApi>,
        store: Arc<dyn SessionStore>,
        catalog: Arc<ModuleCatalog>,
        clock: Arc<dyn Clock>,
        config: LinkConfig,
    ) -> Self {
        Self {
            api,
            store,
            catalog,
            clock,
            config,
            session: Mutex::new(LinkSession::new()),
            subscribers: std::sync::Mutex::new(Vec::new()),
            cancel: CancellationToken::new(),
            scheduler_started: AtomicBool::new(false),
        }
    }

    /// Subscribes to lifecycle notifications.
    ///
    /// Events arrive in the order operations complete; the channel preserves
    /// per-subscriber ordering. Dropped receivers are pruned on the next
    /// emit.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<LinkEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        rx
    }

    fn emit(&self, event: LinkEvent) {
        self.subscribers
            .lock()
            .unwrap()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Restores a persisted session, reconciles it, and starts the
    /// scheduler.
    ///
    /// With nothing persisted the manager stays `Disconnected` and issues no
    /// network calls. A restored session emits `Connected` and is brought up
    /// to date with a `sync`-mode exchange (or `get` when the stored
    /// snapshot is empty). An unreadable record clears storage, emits
    /// `ConnectFailed`, and returns the error.
    pub async fn initialize(self: &Arc<Self>) -> Result<()> {
        {
            let mut session = self.session.lock().await;
            match self.store.load().await {
                Ok(None) => {
                    tracing::debug!("[GuildLink] no stored session; staying disconnected");
                }
                Ok(Some(record)) => {
                    session.identity = Some(record.identity.clone());
                    session.sync = Some(record.sync);
                    session.last_sync_at = record.last_sync_at;
                    session.last_token_refresh_at = record.last_token_refresh_at;
                    session.state = LinkState::Connected;
                    self.emit(LinkEvent::Connected {
                        identity: record.identity,
                    });

                    let mode = if session
                        .sync
                        .as_ref()
                        .is_some_and(|sync| !sync.tech_levels.is_empty())
                    {
                        SyncMode::Sync
                    } else {
                        SyncMode::Get
                    };
                    if let Err(e) = self.exchange(&mut session, mode).await {
                        self.clear_session(&mut session).await;
                        self.emit(LinkEvent::ConnectFailed {
                            message: e.to_string(),
                        });
                        return Err(e);
                    }
                    tracing::info!("[GuildLink] session restored");
                }
                Err(e) => {
                    tracing::warn!("[GuildLink] stored session unusable: {e}");
                    self.clear_session(&mut session).await;
                    self.emit(LinkEvent::ConnectFailed {
                        message: e.to_string(),
                    });
                    return Err(e);
                }
            }
        }
        self.start_scheduler();
        Ok(())
    }

    /// Verifies a connect code and returns the identity it maps to.
    ///
    /// Purely informational; the caller should confirm the identity with
    /// the user before passing it to [`connect`](Self::connect).
    pub async fn check_connect_code(&self, code: &str) -> Result<Identity> {
        self.api.check_identity(code).await
    }

    /// Establishes a connection from a verified identity.
    ///
    /// Any prior session is cleared first. On success the new session is
    /// persisted, `Connected` is emitted, and the snapshot is seeded from
    /// the remote with a `get`-mode exchange.
    pub async fn connect(&self, identity: &Identity) -> Result<Identity> {
        let mut session = self.session.lock().await;
        self.clear_session(&mut session).await;
        session.state = LinkState::Connecting;

        let connected = match self.api.connect(identity).await {
            Ok(connected) => connected,
            Err(e) => {
                session.state = LinkState::Disconnected;
                return Err(e);
            }
        };

        session.identity = Some(connected.clone());
        session.sync = Some(SyncPayload::empty());
        session.last_token_refresh_at = self.clock.now_millis();
        session.state = LinkState::Connected;
        self.persist(&session).await?;
        self.emit(LinkEvent::Connected {
            identity: connected.clone(),
        });

        // The credential is already persisted; a failed seed leaves the
        // session connected and the next tick retries the sync.
        self.exchange(&mut session, SyncMode::Get).await?;
        Ok(connected)
    }

    /// Drops the session from storage and memory and emits `Disconnected`.
    pub async fn logout(&self) {
        let mut session = self.session.lock().await;
        self.clear_session(&mut session).await;
        self.emit(LinkEvent::Disconnected);
        tracing::info!("[GuildLink] logged out");
    }

    /// Stages a module level locally and propagates it with a `sync`-mode
    /// exchange.
    ///
    /// Unknown module ids and non-connected states are rejected before any
    /// mutation. The staged entry stays in memory even when the exchange
    /// fails, so the next sync retries with it included.
    pub async fn set_module_level(&self, module_id: ModuleId, level: u32) -> Result<()> {
        if !self.catalog.contains(module_id) {
            return Err(LinkError::InvalidModule(module_id));
        }

        let mut session = self.session.lock().await;
        if session.state != LinkState::Connected {
            return Err(LinkError::NotConnected);
        }

        let ts = self.clock.now_millis();
        session
            .sync
            .get_or_insert_with(SyncPayload::empty)
            .tech_levels
            .insert(module_id, ModuleLevel { level, ts });

        self.exchange(&mut session, SyncMode::Sync).await
    }

    /// Fetches the guild roster, optionally filtered by a role id.
    pub async fn corp_roster(&self, role_id: Option<&str>) -> Result<CorpData> {
        let session = self.session.lock().await;
        if session.state != LinkState::Connected {
            return Err(LinkError::NotConnected);
        }
        let token = match session.identity.as_ref() {
            Some(identity) => identity.token.clone(),
            None => return Err(LinkError::NotConnected),
        };
        self.api.corp_data(&token, role_id).await
    }

    /// One scheduler pass.
    ///
    /// Refreshes the credential once its window has elapsed; a failed
    /// refresh is fatal to the session (clear, `ConnectFailed`,
    /// `Disconnected`). A stale snapshot is re-synced; sync failures are
    /// logged and retried on the next tick.
    pub async fn tick(&self) {
        let mut session = self.session.lock().await;
        if session.state != LinkState::Connected {
            return;
        }
        let now = self.clock.now_millis();

        if now - session.last_token_refresh_at > self.config.token_refresh_ms {
            let token = match session.identity.as_ref() {
                Some(identity) => identity.token.clone(),
                None => return,
            };
            session.state = LinkState::Refreshing;
            match self.api.refresh_connection(&token).await {
                Ok(identity) => {
                    session.identity = Some(identity);
                    session.last_token_refresh_at = self.clock.now_millis();
                    session.state = LinkState::Connected;
                    if let Err(e) = self.persist(&session).await {
                        tracing::warn!("[GuildLink] failed to persist refreshed credential: {e}");
                    }
                }
                Err(e) => {
                    tracing::warn!("[GuildLink] credential refresh failed: {e}");
                    self.clear_session(&mut session).await;
                    self.emit(LinkEvent::ConnectFailed {
                        message: e.to_string(),
                    });
                    return;
                }
            }
        }

        if now - session.last_sync_at > self.config.data_refresh_ms
            && let Err(e) = self.exchange(&mut session, SyncMode::Sync).await
        {
            tracing::warn!("[GuildLink] periodic sync failed, retrying next tick: {e}");
        }
    }

    /// Stops the scheduler. No further notifications fire once cancelled.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> LinkState {
        self.session.lock().await.state
    }

    /// The connected user, when a session exists.
    pub async fn user(&self) -> Option<User> {
        self.session
            .lock()
            .await
            .identity
            .as_ref()
            .map(|identity| identity.user.clone())
    }

    /// The connected guild, when a session exists.
    pub async fn guild(&self) -> Option<Guild> {
        self.session
            .lock()
            .await
            .identity
            .as_ref()
            .map(|identity| identity.guild.clone())
    }

    /// The current level snapshot, when a session exists.
    pub async fn module_levels(&self) -> Option<ModuleLevels> {
        self.session
            .lock()
            .await
            .sync
            .as_ref()
            .map(|sync| sync.tech_levels.clone())
    }

    /// Exchanges levels with the bot and applies the returned envelope.
    ///
    /// The returned snapshot replaces the cached one in full; the record is
    /// persisted and `Sync` emitted only after the remote confirms.
    async fn exchange(&self, session: &mut LinkSession, mode: SyncMode) -> Result<()> {
        let token = match session.identity.as_ref() {
            Some(identity) => identity.token.clone(),
            None => return Err(LinkError::NotConnected),
        };
        let levels = session
            .sync
            .as_ref()
            .map(|sync| sync.tech_levels.clone())
            .unwrap_or_default();

        let payload = self.api.sync(&token, mode, &levels).await?;
        let levels = payload.tech_levels.clone();
        session.sync = Some(payload);
        session.last_sync_at = self.clock.now_millis();
        self.persist(session).await?;
        self.emit(LinkEvent::Sync { levels });
        Ok(())
    }

    async fn persist(&self, session: &LinkSession) -> Result<()> {
        if let Some(record) = session.record() {
            self.store.save(&record).await?;
        }
        Ok(())
    }

    async fn clear_session(&self, session: &mut LinkSession) {
        if let Err(e) = self.store.clear().await {
            tracing::warn!("[GuildLink] failed to clear stored session: {e}");
        }
        session.reset();
    }

    fn start_scheduler(self: &Arc<Self>) {
        if self.scheduler_started.swap(true, Ordering::SeqCst) {
            tracing::warn!("[GuildLink] scheduler already running, skipping");
            return;
        }

        let manager = Arc::clone(self);
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(manager.config.tick_interval());
            // The first interval tick completes immediately; consume it so
            // the first pass runs one full period after startup.
            ticker.tick().await;
            tracing::info!(
                "[GuildLink] scheduler started ({}s interval)",
                manager.config.tick_interval_secs
            );
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = async { ticker.tick().await; manager.tick().await } => {}
                }
            }
            tracing::debug!("[GuildLink] scheduler stopped");
        });
    }
}
