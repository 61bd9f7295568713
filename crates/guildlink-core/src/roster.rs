//! Guild roster data returned by the read-only corp query.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::levels::ModuleId;

/// One guild member as reported by the bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpMember {
    pub name: String,
    pub user_id: String,
    pub client_user_id: String,
    pub avatar: Option<String>,
    /// Keyed on module ids; each value is `[level, ws_score]`.
    #[serde(default)]
    pub tech: HashMap<ModuleId, Vec<u32>>,
    pub avatar_url: Option<String>,
    pub time_zone: Option<String>,
    pub local_time: Option<String>,
    /// Timezone offset in minutes.
    pub zone_offset: Option<i32>,
    /// Readable AFK duration.
    pub afk_for: Option<String>,
    /// Epoch seconds when the member returns.
    pub afk_when: Option<i64>,
}

/// A guild role usable as a roster filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpRole {
    pub id: String,
    pub name: String,
}

/// Roster payload: all members, the available roles, and the active filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpData {
    pub members: Vec<CorpMember>,
    pub roles: Vec<CorpRole>,
    pub filter_id: Option<String>,
    pub filter_name: Option<String>,
}
