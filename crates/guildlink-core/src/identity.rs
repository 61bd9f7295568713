//! Identity types issued by the bot service.

use serde::{Deserialize, Serialize};

/// A user of the bot service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    /// No longer used by the service; kept for wire compatibility.
    #[serde(default)]
    pub discriminator: String,
    /// Avatar image id.
    pub avatar: String,
    /// Absolute avatar image URL, composed by the gateway.
    pub avatar_url: String,
}

/// The guild a connection is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: String,
    pub name: String,
    /// Guild icon id.
    pub icon: String,
    /// Absolute icon image URL, composed by the gateway.
    pub url: String,
}

/// A connected identity: the user, the selected guild, and the credential
/// authorizing subsequent calls.
///
/// Immutable once issued; replaced wholesale on refresh or reconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user: User,
    pub guild: Guild,
    pub token: String,
}
