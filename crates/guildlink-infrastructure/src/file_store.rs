//! File-backed session store.
//!
//! Persists the single session record as one JSON file. Writes go through a
//! temporary file in the same directory followed by `sync_all` and an atomic
//! rename, so a crash mid-write never leaves a half-written record behind.

use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use guildlink_core::{LinkError, Result, SessionRecord, SessionStore};

/// Session store over a single JSON file.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store at the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at the default location under the user config
    /// directory (`<config>/guildlink/session.json`).
    pub fn default_location() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| LinkError::io("could not determine config directory"))?;
        Ok(Self::new(base.join("guildlink").join("session.json")))
    }

    /// The file path this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn write_atomic(path: &Path, contents: String) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name")
    })?;
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    let mut tmp_file = std::fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents.as_bytes())?;
    tmp_file.sync_all()?;
    drop(tmp_file);

    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<SessionRecord>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| LinkError::corrupt_session(e.to_string()))
    }

    async fn save(&self, record: &SessionRecord) -> Result<()> {
        let contents = serde_json::to_string_pretty(record)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, contents))
            .await
            .map_err(|e| LinkError::io(format!("failed to join write task: {e}")))?
            .map_err(LinkError::from)
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guildlink_core::{Guild, Identity, ModuleLevel, SyncPayload, User};
    use tempfile::TempDir;

    fn sample_record() -> SessionRecord {
        let mut sync = SyncPayload::empty();
        sync.tech_levels.insert(701, ModuleLevel { level: 4, ts: 1000 });
        SessionRecord {
            identity: Identity {
                user: User {
                    id: "u1".to_string(),
                    username: "kai".to_string(),
                    discriminator: "0".to_string(),
                    avatar: "av".to_string(),
                    avatar_url: "https://cdn.discordapp.com/avatars/u1/av.png".to_string(),
                },
                guild: Guild {
                    id: "g1".to_string(),
                    name: "Red Corp".to_string(),
                    icon: "ic".to_string(),
                    url: "https://cdn.discordapp.com/icons/g1/ic.png".to_string(),
                },
                token: "token-1".to_string(),
            },
            sync,
            last_sync_at: 1000,
            last_token_refresh_at: 900,
        }
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        let record = sample_record();
        store.save(&record).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn load_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("absent.json"));

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn load_empty_file_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "  \n").unwrap();

        let store = FileSessionStore::new(path);
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_record_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileSessionStore::new(path);
        let err = store.load().await.unwrap_err();
        assert!(err.is_corrupt_session());
    }

    #[tokio::test]
    async fn clear_removes_record_and_tolerates_absence() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        store.clear().await.unwrap();

        store.save(&sample_record()).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_creates_parent_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileSessionStore::new(path.clone());

        store.save(&sample_record()).await.unwrap();

        assert!(path.exists());
        assert!(!path.with_file_name(".session.json.tmp").exists());
    }
}
