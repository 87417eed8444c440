// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::alias::AliasRecord;
use crate::location::{Level, LocationLevel, MyLocation};
use crate::{IntentError, Result};
use directories::ProjectDirs;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub const SMART_ALIASES_KEY: &str = "smartAliases";
pub const CUSTOM_ALIASES_KEY: &str = "customLocationAliases:v1";
pub const MY_LOCATION_KEY: &str = "myLocation:v1";

/// String key/value persistence, last write wins.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: IndexMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.shift_remove(key);
        Ok(())
    }
}

/// A single JSON object on disk; every write is flushed immediately.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: IndexMap<String, String>,
}

impl JsonFileStore {
    /// Opens (or lazily creates) the store at `path`. A corrupt file is
    /// treated as empty and overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values: IndexMap<String, String> = if path.exists() {
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("[Store] Ignoring unreadable store {:?}: {}", path, e);
                    IndexMap::new()
                }
            }
        } else {
            log::debug!("[Store] No store at {:?}, starting empty", path);
            IndexMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        ProjectDirs::from("org", "tripintent", "tripintent")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .unwrap_or_else(|| PathBuf::from("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, content)?;
        log::debug!("[Store] Wrote {} keys to {:?}", self.values.len(), self.path);
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.shift_remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartSettings {
    pub smart_aliases: bool,
}

impl Default for SmartSettings {
    fn default() -> Self {
        Self {
            smart_aliases: true,
        }
    }
}

/// Only an explicit `"0"` switches smart aliases off.
pub fn load_smart_settings(store: &dyn KeyValueStore) -> SmartSettings {
    SmartSettings {
        smart_aliases: store.get(SMART_ALIASES_KEY).as_deref() != Some("0"),
    }
}

pub fn save_smart_settings(store: &mut dyn KeyValueStore, settings: SmartSettings) -> Result<()> {
    store.set(
        SMART_ALIASES_KEY,
        if settings.smart_aliases { "1" } else { "0" },
    )
}

/// Flips the flag and returns the new value.
pub fn toggle_smart_aliases(store: &mut dyn KeyValueStore) -> Result<bool> {
    let settings = SmartSettings {
        smart_aliases: !load_smart_settings(store).smart_aliases,
    };
    save_smart_settings(store, settings)?;
    Ok(settings.smart_aliases)
}

/// Custom aliases in saved order. Anything unreadable yields an empty list;
/// individual malformed entries are dropped.
pub fn load_custom_aliases(store: &dyn KeyValueStore) -> Vec<AliasRecord> {
    let Some(raw) = store.get(CUSTOM_ALIASES_KEY) else {
        return Vec::new();
    };
    let entries: Vec<Value> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("[Store] Discarding corrupt custom aliases: {}", e);
            return Vec::new();
        }
    };
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<AliasRecord>(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("[Store] Skipping malformed alias entry: {}", e);
                None
            }
        })
        .collect()
}

pub fn save_custom_aliases(store: &mut dyn KeyValueStore, records: &[AliasRecord]) -> Result<()> {
    store.set(CUSTOM_ALIASES_KEY, &serde_json::to_string(records)?)
}

/// Adds or replaces the alias for `key`; the new record goes to the end.
pub fn upsert_custom_alias(
    store: &mut dyn KeyValueStore,
    key: &str,
    level: Level,
    value: &str,
) -> Result<AliasRecord> {
    let key = key.trim().to_lowercase();
    let value = value.trim();
    if key.is_empty() {
        return Err(IntentError::InvalidAlias("alias key is empty".to_string()));
    }
    if value.is_empty() {
        return Err(IntentError::InvalidAlias(format!("no {level} given for {key:?}")));
    }

    let record = AliasRecord::new(&key, &LocationLevel::new(level, value));
    let mut records = load_custom_aliases(store);
    records.retain(|r| r.normalized_key() != key);
    records.push(record.clone());
    save_custom_aliases(store, &records)?;
    log::info!("[Store] Saved alias {:?} -> {} {:?}", key, level, value);
    Ok(record)
}

/// Returns whether anything was removed.
pub fn remove_custom_alias(store: &mut dyn KeyValueStore, key: &str) -> Result<bool> {
    let key = key.trim().to_lowercase();
    let mut records = load_custom_aliases(store);
    let before = records.len();
    records.retain(|r| r.normalized_key() != key);
    if records.len() == before {
        return Ok(false);
    }
    save_custom_aliases(store, &records)?;
    Ok(true)
}

/// Saves the location, or clears it when nothing is set.
pub fn persist_my_location(store: &mut dyn KeyValueStore, location: &MyLocation) -> Result<()> {
    if !location.is_set() {
        return store.remove(MY_LOCATION_KEY);
    }
    store.set(MY_LOCATION_KEY, &serde_json::to_string(location)?)
}

pub fn load_my_location(store: &dyn KeyValueStore) -> MyLocation {
    let Some(raw) = store.get(MY_LOCATION_KEY) else {
        return MyLocation::default();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        log::warn!("[Store] Discarding corrupt location: {}", e);
        MyLocation::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_smart_flag_defaults_on() -> anyhow::Result<()> {
        let mut store = MemoryStore::new();
        assert!(load_smart_settings(&store).smart_aliases);

        store.set(SMART_ALIASES_KEY, "true")?;
        assert!(load_smart_settings(&store).smart_aliases);

        assert!(!toggle_smart_aliases(&mut store)?);
        assert_eq!(store.get(SMART_ALIASES_KEY).as_deref(), Some("0"));
        assert!(toggle_smart_aliases(&mut store)?);
        Ok(())
    }

    #[test]
    fn test_corrupt_aliases_yield_empty() -> anyhow::Result<()> {
        let mut store = MemoryStore::new();
        store.set(CUSTOM_ALIASES_KEY, "{broken")?;
        assert!(load_custom_aliases(&store).is_empty());

        store.set(CUSTOM_ALIASES_KEY, r#"{"key":"x"}"#)?;
        assert!(load_custom_aliases(&store).is_empty(), "not a list");

        store.set(CUSTOM_ALIASES_KEY, r#"[{"key":"cbd","city":"Cape Town"}, 7]"#)?;
        let records = load_custom_aliases(&store);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].city.as_deref(), Some("Cape Town"));
        Ok(())
    }

    #[test]
    fn test_upsert_replaces_and_appends() -> anyhow::Result<()> {
        let mut store = MemoryStore::new();
        upsert_custom_alias(&mut store, "CBD", Level::City, "Cape Town")?;
        upsert_custom_alias(&mut store, "home", Level::City, "Durban")?;
        upsert_custom_alias(&mut store, " cbd ", Level::Area, " Foreshore ")?;

        let records = load_custom_aliases(&store);
        let keys: Vec<&str> = records.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["home", "cbd"]);
        assert_eq!(records[1].location(), LocationLevel::Area("Foreshore".to_string()));
        assert_eq!(records[1].city, None);
        Ok(())
    }

    #[test]
    fn test_upsert_rejects_blank() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            upsert_custom_alias(&mut store, "  ", Level::City, "Durban"),
            Err(IntentError::InvalidAlias(_))
        ));
        assert!(matches!(
            upsert_custom_alias(&mut store, "home", Level::City, " "),
            Err(IntentError::InvalidAlias(_))
        ));
        assert!(store.get(CUSTOM_ALIASES_KEY).is_none());
    }

    #[test]
    fn test_remove_alias() -> anyhow::Result<()> {
        let mut store = MemoryStore::new();
        upsert_custom_alias(&mut store, "home", Level::City, "Durban")?;
        assert!(!remove_custom_alias(&mut store, "work")?);
        assert!(remove_custom_alias(&mut store, "HOME")?);
        assert!(load_custom_aliases(&store).is_empty());
        Ok(())
    }

    #[test]
    fn test_my_location_round_trip_and_clear() -> anyhow::Result<()> {
        let mut store = MemoryStore::new();
        assert_eq!(load_my_location(&store), MyLocation::default());

        let mine = MyLocation {
            province: Some("Gauteng".to_string()),
            ..MyLocation::default()
        };
        persist_my_location(&mut store, &mine)?;
        assert_eq!(load_my_location(&store), mine);

        persist_my_location(&mut store, &MyLocation::default())?;
        assert!(store.get(MY_LOCATION_KEY).is_none());

        store.set(MY_LOCATION_KEY, "nope")?;
        assert_eq!(load_my_location(&store), MyLocation::default());
        Ok(())
    }

    #[test]
    fn test_json_file_store_persists() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("settings.json");

        let mut store = JsonFileStore::open(&path)?;
        assert!(store.get(SMART_ALIASES_KEY).is_none());
        save_smart_settings(&mut store, SmartSettings { smart_aliases: false })?;
        upsert_custom_alias(&mut store, "cbd", Level::City, "Cape Town")?;
        assert!(path.exists());

        let reopened = JsonFileStore::open(&path)?;
        assert!(!load_smart_settings(&reopened).smart_aliases);
        assert_eq!(load_custom_aliases(&reopened).len(), 1);
        Ok(())
    }

    #[test]
    fn test_json_file_store_survives_corruption() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.json");
        fs::write(&path, "][")?;

        let mut store = JsonFileStore::open(&path)?;
        assert!(store.get(MY_LOCATION_KEY).is_none());
        store.set("k", "v")?;
        assert_eq!(JsonFileStore::open(&path)?.get("k").as_deref(), Some("v"));
        Ok(())
    }
}
