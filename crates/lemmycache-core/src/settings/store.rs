use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Keys of the settings this crate reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    FavoriteCommunities,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::FavoriteCommunities => "favorite_communities",
        }
    }
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_setting(&self, key: SettingKey, user_handle: &str) -> Result<Option<Value>>;

    async fn set_setting(&self, key: SettingKey, value: Value, user_handle: &str) -> Result<()>;
}

/// On-disk layout of one user's settings file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct UserSettings {
    #[serde(default)]
    values: BTreeMap<String, Value>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// Settings stored as `<dir>/<user_handle>.json`.
pub struct FileSettingsStore {
    settings_dir: PathBuf,
}

impl FileSettingsStore {
    pub fn new(settings_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&settings_dir).with_context(|| {
            format!("Failed to create settings directory: {}", settings_dir.display())
        })?;
        Ok(Self { settings_dir })
    }

    /// Handles contain `@` and `.`; anything outside a conservative set is
    /// replaced so a handle can never escape the settings directory.
    fn settings_path(&self, user_handle: &str) -> PathBuf {
        let file_stem: String = user_handle
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let file_stem = file_stem.trim_start_matches('.');
        self.settings_dir.join(format!("{}.json", file_stem))
    }

    fn load(&self, user_handle: &str) -> Result<UserSettings> {
        let path = self.settings_path(user_handle);
        if !path.exists() {
            return Ok(UserSettings::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings for {}", user_handle))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings for {}", user_handle))
    }

    fn save(&self, user_handle: &str, settings: &UserSettings) -> Result<()> {
        let path = self.settings_path(user_handle);
        let contents = serde_json::to_string_pretty(settings)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write settings for {}", user_handle))?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn get_setting(&self, key: SettingKey, user_handle: &str) -> Result<Option<Value>> {
        let settings = self.load(user_handle)?;
        Ok(settings.values.get(key.as_str()).cloned())
    }

    async fn set_setting(&self, key: SettingKey, value: Value, user_handle: &str) -> Result<()> {
        let mut settings = self.load(user_handle)?;
        settings.values.insert(key.as_str().to_string(), value);
        settings.updated_at = Some(Utc::now());
        self.save(user_handle, &settings)?;
        debug!(key = key.as_str(), user = user_handle, "Saved setting");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store(name: &str) -> (FileSettingsStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!(
            "lemmycache-settings-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        (FileSettingsStore::new(dir.clone()).unwrap(), dir)
    }

    #[tokio::test]
    async fn test_missing_setting_is_none() {
        let (store, dir) = temp_store("missing");
        let value = store
            .get_setting(SettingKey::FavoriteCommunities, "alice@lemmy.ml")
            .await
            .unwrap();
        assert!(value.is_none());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_settings_are_scoped_per_user() {
        let (store, dir) = temp_store("scoped");
        store
            .set_setting(
                SettingKey::FavoriteCommunities,
                json!(["rust@programming.dev"]),
                "alice@lemmy.ml",
            )
            .await
            .unwrap();

        let alice = store
            .get_setting(SettingKey::FavoriteCommunities, "alice@lemmy.ml")
            .await
            .unwrap();
        assert_eq!(alice, Some(json!(["rust@programming.dev"])));

        let bob = store
            .get_setting(SettingKey::FavoriteCommunities, "bob@lemmy.ml")
            .await
            .unwrap();
        assert!(bob.is_none());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_value() {
        let (store, dir) = temp_store("overwrite");
        let key = SettingKey::FavoriteCommunities;
        store.set_setting(key, json!(["a"]), "carol@x.y").await.unwrap();
        store.set_setting(key, json!(["a", "b"]), "carol@x.y").await.unwrap();
        assert_eq!(
            store.get_setting(key, "carol@x.y").await.unwrap(),
            Some(json!(["a", "b"]))
        );
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_settings_path_sanitizes_handle() {
        let (store, dir) = temp_store("paths");
        let path = store.settings_path("../../etc/passwd");
        assert_eq!(path.parent(), Some(dir.as_path()));
        assert_eq!(
            store.settings_path("alice@lemmy.ml"),
            dir.join("alice@lemmy.ml.json")
        );
        let _ = std::fs::remove_dir_all(dir);
    }
}
