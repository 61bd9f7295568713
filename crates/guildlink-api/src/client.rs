//! HTTP implementation of the bot service gateway.
//!
//! One network round-trip per operation. Statuses in `[200, 400)` succeed,
//! `[400, 500)` carry a server-supplied message surfaced as
//! `RemoteRejected`, and everything else (including transport failures)
//! surfaces as `ServiceUnavailable`. Avatar and icon ids returned by the
//! service are composed into absolute CDN URLs before an [`Identity`] is
//! handed to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use guildlink_core::{
    BotApi, CorpData, Guild, Identity, LinkError, ModuleLevels, Result, SYNC_VERSION, SyncMode,
    SyncPayload, User,
};

/// Default deployment of the bot service.
pub const DEFAULT_BOT_URL: &str = "https://bot.guildlink.dev/api";

const CDN_URL: &str = "https://cdn.discordapp.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Gateway to the bot service over HTTP.
#[derive(Clone)]
pub struct HttpBotApi {
    client: Client,
    base_url: String,
}

impl HttpBotApi {
    /// Creates a gateway against the given service base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for HttpBotApi {
    fn default() -> Self {
        Self::new(DEFAULT_BOT_URL)
    }
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    username: String,
    #[serde(default)]
    discriminator: String,
    avatar: String,
}

impl WireUser {
    fn into_user(self) -> User {
        let avatar_url = avatar_url(&self.id, &self.avatar);
        User {
            id: self.id,
            username: self.username,
            discriminator: self.discriminator,
            avatar: self.avatar,
            avatar_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireGuild {
    id: String,
    name: String,
    icon: String,
}

impl WireGuild {
    fn into_guild(self) -> Guild {
        let url = icon_url(&self.id, &self.icon);
        Guild {
            id: self.id,
            name: self.name,
            icon: self.icon,
            url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdentitiesResponse {
    user: WireUser,
    guilds: Vec<WireGuild>,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ConnectResponse {
    user: WireUser,
    guild: WireGuild,
    token: String,
}

#[derive(Debug, Serialize)]
struct ConnectRequest<'a> {
    guild_id: &'a str,
}

#[derive(Debug, Serialize)]
struct SyncRequest<'a> {
    ver: u32,
    #[serde(rename = "techLevels")]
    tech_levels: &'a ModuleLevels,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// User avatar image URL template.
fn avatar_url(user_id: &str, avatar: &str) -> String {
    format!("{CDN_URL}/avatars/{user_id}/{avatar}.png")
}

/// Guild icon image URL template.
fn icon_url(guild_id: &str, icon: &str) -> String {
    format!("{CDN_URL}/icons/{guild_id}/{icon}.png")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Rejected,
    Unavailable,
}

fn classify(status: u16) -> Outcome {
    match status {
        200..=399 => Outcome::Success,
        400..=499 => Outcome::Rejected,
        _ => Outcome::Unavailable,
    }
}

fn transport_error(err: reqwest::Error) -> LinkError {
    LinkError::service_unavailable(format!("request failed: {err}"))
}

async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status().as_u16();
    match classify(status) {
        Outcome::Unavailable => Err(LinkError::service_unavailable(format!(
            "server error (status {status})"
        ))),
        Outcome::Rejected => {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("request rejected (status {status})"));
            Err(LinkError::remote_rejected(message))
        }
        Outcome::Success => response
            .json::<T>()
            .await
            .map_err(|e| LinkError::service_unavailable(format!("invalid response body: {e}"))),
    }
}

#[async_trait]
impl BotApi for HttpBotApi {
    async fn check_identity(&self, code: &str) -> Result<Identity> {
        let url = format!("{}/applink/identities?ver=2&code=1", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", code)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(transport_error)?;

        let body: IdentitiesResponse = read_response(response).await?;
        let guild = body.guilds.into_iter().next().ok_or_else(|| {
            LinkError::service_unavailable("identity response contained no guilds")
        })?;

        tracing::debug!("[BotApi] connect code verified for {}", body.user.username);
        Ok(Identity {
            user: body.user.into_user(),
            guild: guild.into_guild(),
            token: body.token,
        })
    }

    async fn connect(&self, identity: &Identity) -> Result<Identity> {
        let url = format!("{}/applink/connect", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", &identity.token)
            .json(&ConnectRequest {
                guild_id: &identity.guild.id,
            })
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(transport_error)?;

        let body: ConnectResponse = read_response(response).await?;
        tracing::info!(
            "[BotApi] connection established to guild {}",
            body.guild.name
        );
        Ok(Identity {
            user: body.user.into_user(),
            guild: body.guild.into_guild(),
            token: body.token,
        })
    }

    async fn refresh_connection(&self, token: &str) -> Result<Identity> {
        let url = format!("{}/applink/refresh", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(transport_error)?;

        let body: ConnectResponse = read_response(response).await?;
        tracing::debug!("[BotApi] credential refreshed");
        Ok(Identity {
            user: body.user.into_user(),
            guild: body.guild.into_guild(),
            token: body.token,
        })
    }

    async fn sync(
        &self,
        token: &str,
        mode: SyncMode,
        levels: &ModuleLevels,
    ) -> Result<SyncPayload> {
        // Get mode always seeds from the remote; never send local state.
        let empty = ModuleLevels::new();
        let levels = if mode == SyncMode::Get { &empty } else { levels };

        let url = format!("{}/cmd/syncTech/{}", self.base_url, mode.as_str());
        let response = self
            .client
            .post(&url)
            .header("Authorization", token)
            .json(&SyncRequest {
                ver: SYNC_VERSION,
                tech_levels: levels,
            })
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(transport_error)?;

        read_response(response).await
    }

    async fn corp_data(&self, token: &str, role_id: Option<&str>) -> Result<CorpData> {
        let url = format!("{}/cmd/corpdata", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("roleId", role_id.unwrap_or(""))])
            .header("Authorization", token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(transport_error)?;

        read_response(response).await
    }
}
