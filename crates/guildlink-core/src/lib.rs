//! Core domain types and contracts for the GuildLink connector.
//!
//! # Module Structure
//!
//! - `identity`: user/guild identity issued by the bot service
//! - `levels`: module levels, the sync envelope, and the merge helper
//! - `catalog`: static module name/id table
//! - `roster`: read-only guild roster payload
//! - `session`: the persisted session record
//! - `gateway`: the remote service contract ([`BotApi`])
//! - `store`: the persistence contract ([`SessionStore`])
//! - `clock`: injectable time source
//! - `event`: lifecycle notifications
//! - `error`: shared error taxonomy

pub mod catalog;
pub mod clock;
pub mod error;
pub mod event;
pub mod gateway;
pub mod identity;
pub mod levels;
pub mod roster;
pub mod session;
pub mod store;

pub use catalog::ModuleCatalog;
pub use clock::{Clock, SystemClock};
pub use error::{LinkError, Result};
pub use event::LinkEvent;
pub use gateway::BotApi;
pub use identity::{Guild, Identity, User};
pub use levels::{
    ModuleId, ModuleLevel, ModuleLevels, SYNC_VERSION, SyncMode, SyncPayload, merge_levels,
};
pub use roster::{CorpData, CorpMember, CorpRole};
pub use session::SessionRecord;
pub use store::SessionStore;
