//! SSID -> vendor persistence. The table is a flat JSON object so it stays
//! readable and hand-editable; every Auto-mode change is written straight through.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::IdentityError;

pub const DEFAULT_PROFILES_PATH: &str = "/var/lib/mac_identity_profiles.json";

/// Profile file location, overridable through MAC_IDENTITY_PROFILES
pub fn default_profiles_path() -> PathBuf {
    env::var("MAC_IDENTITY_PROFILES")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILES_PATH))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileTable {
    entries: BTreeMap<String, String>,
}

impl ProfileTable {
    /// Missing or unreadable files yield an empty table
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("Could not read profile store {}: {}", path.display(), e);
                return Self::default();
            }
        };

        if content.trim().is_empty() {
            return Self::default();
        }

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring malformed profile store {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), IdentityError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(path, json)?;
        Ok(())
    }

    pub fn get(&self, ssid: &str) -> Option<&str> {
        self.entries.get(ssid).map(String::as_str)
    }

    /// Returns true when the mapping changed
    pub fn put(&mut self, ssid: &str, vendor: &str) -> bool {
        match self.entries.insert(ssid.to_string(), vendor.to_string()) {
            Some(previous) => previous != vendor,
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProfileTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Read/write access to SSID -> vendor mappings, as used by the selector
pub trait ProfileStore {
    fn get(&self, ssid: &str) -> Option<String>;
    /// Returns true when the mapping changed
    fn put(&mut self, ssid: &str, vendor: &str) -> bool;
    fn save(&mut self) -> Result<(), IdentityError>;
}

/// Store backed by a JSON file
pub struct FileProfileStore {
    path: PathBuf,
    table: ProfileTable,
}

impl FileProfileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let table = ProfileTable::load(&path);
        Self { path, table }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> &ProfileTable {
        &self.table
    }
}

impl ProfileStore for FileProfileStore {
    fn get(&self, ssid: &str) -> Option<String> {
        self.table.get(ssid).map(str::to_string)
    }

    fn put(&mut self, ssid: &str, vendor: &str) -> bool {
        self.table.put(ssid, vendor)
    }

    fn save(&mut self) -> Result<(), IdentityError> {
        self.table.save(&self.path)
    }
}

/// In-memory store; counts saves instead of touching the filesystem
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    pub table: ProfileTable,
    pub saves: usize,
}

#[cfg(test)]
impl MemoryProfileStore {
    pub fn new(table: ProfileTable) -> Self {
        Self { table, saves: 0 }
    }
}

#[cfg(test)]
impl ProfileStore for MemoryProfileStore {
    fn get(&self, ssid: &str) -> Option<String> {
        self.table.get(ssid).map(str::to_string)
    }

    fn put(&mut self, ssid: &str, vendor: &str) -> bool {
        self.table.put(ssid, vendor)
    }

    fn save(&mut self) -> Result<(), IdentityError> {
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let table = ProfileTable::load(&dir.path().join("absent.json"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(ProfileTable::load(&path).is_empty());
    }

    #[test]
    fn test_round_trip_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        let table = ProfileTable::default();
        table.save(&path).unwrap();
        assert_eq!(ProfileTable::load(&path), table);
    }

    #[test]
    fn test_round_trip_entries() {
        let dir = tempfile::tempdir().unwrap();
        // Parent directories are created on save
        let path = dir.path().join("var/lib/profiles.json");
        let table: ProfileTable = [("HomeWiFi", "apple"), ("OfficeNetwork", "intel")]
            .into_iter()
            .collect();
        table.save(&path).unwrap();

        let loaded = ProfileTable::load(&path);
        assert_eq!(loaded, table);
        assert_eq!(loaded.get("HomeWiFi"), Some("apple"));
        assert_eq!(loaded.get("OfficeNetwork"), Some("intel"));

        // Human-readable, one key per SSID
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"HomeWiFi\": \"apple\""));
    }

    #[test]
    fn test_put_overwrites() {
        let mut table = ProfileTable::default();
        assert!(table.put("Cafe", "apple"));
        assert!(!table.put("Cafe", "apple"));
        assert!(table.put("Cafe", "samsung"));
        assert_eq!(table.get("Cafe"), Some("samsung"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_file_store_write_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");

        let mut store = FileProfileStore::open(&path);
        assert_eq!(store.get("HomeWiFi"), None);
        store.put("HomeWiFi", "apple");
        store.save().unwrap();

        let reopened = FileProfileStore::open(&path);
        assert_eq!(reopened.get("HomeWiFi").as_deref(), Some("apple"));
        assert_eq!(reopened.table().len(), 1);
    }

    #[test]
    fn test_save_failure_keeps_memory() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the target path makes the write fail
        let path = dir.path().join("profiles.json");
        fs::create_dir(&path).unwrap();

        let mut store = FileProfileStore::open(&path);
        store.put("HomeWiFi", "apple");
        assert!(matches!(store.save(), Err(IdentityError::IoFailure(_))));
        assert_eq!(store.get("HomeWiFi").as_deref(), Some("apple"));
    }
}
