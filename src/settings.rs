//! Persisted user settings: target executable and global hotkey.
//!
//! Stored as a flat JSON object. Writes are merges: the file is re-read,
//! only our keys are replaced, and unrelated keys survive. A missing or
//! unreadable file loads as defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config;

/// Values recognized by the app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub game_exe: String,
    /// Empty string means "no hotkey".
    #[serde(default)]
    pub hotkey: String,
}

impl Settings {
    pub fn hotkey(&self) -> Option<&str> {
        let chord = self.hotkey.trim();
        (!chord.is_empty()).then_some(chord)
    }
}

/// Handle to the settings file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted in `dir` using the standard file name.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(config::SETTINGS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults on any error.
    ///
    /// Keys are read one at a time, so a malformed value only resets its own key.
    pub fn load(&self) -> Settings {
        match self.read_map() {
            Ok(map) => Settings {
                game_exe: self.string_key(&map, config::SETTINGS_KEY_GAME_EXE),
                hotkey: self.string_key(&map, config::SETTINGS_KEY_HOTKEY),
            },
            Err(e) => {
                tracing::warn!("Using default settings: {e:#}");
                Settings::default()
            }
        }
    }

    fn string_key(&self, map: &Map<String, Value>, key: &str) -> String {
        match map.get(key) {
            None => String::new(),
            Some(value) => String::deserialize(value).unwrap_or_else(|e| {
                tracing::warn!("Ignoring setting '{key}' in {}: {e}", self.path.display());
                String::new()
            }),
        }
    }

    pub fn save_game_exe(&self, path: &str) -> Result<()> {
        self.merge(config::SETTINGS_KEY_GAME_EXE, Value::String(path.to_string()))
    }

    pub fn save_hotkey(&self, chord: Option<&str>) -> Result<()> {
        self.merge(
            config::SETTINGS_KEY_HOTKEY,
            Value::String(chord.unwrap_or_default().to_string()),
        )
    }

    fn merge(&self, key: &str, value: Value) -> Result<()> {
        let mut map = self.read_map().unwrap_or_default();
        map.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(map))?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("writing {}", self.path.display()))?;
        tracing::debug!("Saved setting '{key}' to {}", self.path.display());
        Ok(())
    }

    fn read_map(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, SettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::in_dir(dir.path());
        (dir, store)
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let (_dir, store) = store();
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_corrupt_file_loads_defaults() {
        let (_dir, store) = store();
        std::fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_wrong_value_type_loads_defaults() {
        let (_dir, store) = store();
        std::fs::write(store.path(), r#"{ "game_exe": 42 }"#).unwrap();
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_malformed_key_keeps_other_values() {
        let (_dir, store) = store();
        std::fs::write(store.path(), r#"{ "game_exe": "C:\\g.exe", "hotkey": null }"#).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.game_exe, r"C:\g.exe");
        assert_eq!(loaded.hotkey(), None);
    }

    #[test]
    fn test_saved_values_round_trip() {
        let (_dir, store) = store();
        store.save_game_exe(r"C:\Games\game.exe").unwrap();
        store.save_hotkey(Some("ctrl+shift+F9")).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.game_exe, r"C:\Games\game.exe");
        assert_eq!(loaded.hotkey(), Some("ctrl+shift+F9"));
    }

    #[test]
    fn test_merge_preserves_unrelated_keys() {
        let (_dir, store) = store();
        std::fs::write(store.path(), r#"{ "theme": "dark", "hotkey": "F8" }"#).unwrap();

        store.save_game_exe(r"C:\g.exe").unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw["hotkey"], "F8");
        assert_eq!(raw["game_exe"], r"C:\g.exe");
    }

    #[test]
    fn test_cleared_hotkey_is_stored_empty() {
        let (_dir, store) = store();
        store.save_hotkey(Some("F8")).unwrap();
        store.save_hotkey(None).unwrap();
        assert_eq!(store.load().hotkey(), None);
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::in_dir(&dir.path().join("nested").join("config"));
        store.save_game_exe(r"C:\g.exe").unwrap();
        assert_eq!(store.load().game_exe, r"C:\g.exe");
    }
}
